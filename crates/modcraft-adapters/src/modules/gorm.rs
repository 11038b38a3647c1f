//! `db:gorm`: GORM with one SQL driver, picked per project.

use std::fmt;
use std::str::FromStr;

use tracing::{info, warn};

use modcraft_core::{
    application::{
        ApplicationError,
        ports::{Module, ModuleContext},
    },
    domain::{ModuleDescriptor, ModuleTemplate, Value, ValueMap},
    error::CraftResult,
};

use super::template_module::{
    Binding, Requirement, add_requirements, marker_absent, merge_config_defaults, parse_defaults,
    wire,
};

/// SQL drivers the generated code can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Driver {
    Postgres,
    Mysql,
    #[default]
    Sqlite,
}

impl Driver {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Mysql => "mysql",
            Self::Sqlite => "sqlite",
        }
    }

    /// Infer the driver from a DSN's shape.
    pub fn from_dsn(dsn: &str) -> Option<Self> {
        let dsn = dsn.trim().to_ascii_lowercase();
        if dsn.is_empty() {
            return None;
        }
        if ["postgres://", "postgresql://", "pgx://"]
            .iter()
            .any(|p| dsn.starts_with(p))
            || (dsn.contains("host=") && (dsn.contains("dbname=") || dsn.contains("user=")))
        {
            return Some(Self::Postgres);
        }
        if dsn.starts_with("mysql://") || (dsn.contains("@tcp(") && dsn.contains(")/")) {
            return Some(Self::Mysql);
        }
        if dsn.starts_with("file:") || dsn.ends_with(".db") || dsn.contains(":memory:") {
            return Some(Self::Sqlite);
        }
        None
    }

    fn requirement(&self) -> Requirement {
        match self {
            Self::Postgres => Requirement::new("gorm.io/driver/postgres", "v1.5.7"),
            Self::Mysql => Requirement::new("gorm.io/driver/mysql", "v1.5.6"),
            Self::Sqlite => Requirement::new("gorm.io/driver/sqlite", "v1.5.7"),
        }
    }
}

impl FromStr for Driver {
    type Err = ApplicationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "pg" | "postgre" | "postgresql" => Ok(Self::Postgres),
            "mysql" => Ok(Self::Mysql),
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            other => Err(ApplicationError::invalid_argument(format!(
                "unsupported gorm driver '{other}' (expected postgres, mysql or sqlite)"
            ))),
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the driver was chosen; only explicit or inferred choices are
/// persisted to the project's config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverChoice {
    Explicit(Driver),
    Inferred(Driver),
    Default,
}

impl DriverChoice {
    /// From the `gorm.driver` and `gorm.dsn` generation values.
    ///
    /// An unrecognised driver name falls back to sqlite with a warning.
    pub fn from_values(driver: Option<&str>, dsn: Option<&str>) -> Self {
        match driver.map(str::trim).filter(|d| !d.is_empty()) {
            Some(raw) => match raw.parse() {
                Ok(driver) => Self::Explicit(driver),
                Err(e) => {
                    warn!(error = %e, "falling back to sqlite");
                    Self::Default
                }
            },
            None => dsn
                .and_then(Driver::from_dsn)
                .map_or(Self::Default, Self::Inferred),
        }
    }

    pub fn driver(&self) -> Driver {
        match self {
            Self::Explicit(d) | Self::Inferred(d) => *d,
            Self::Default => Driver::default(),
        }
    }

    fn persisted(&self) -> Option<Driver> {
        match self {
            Self::Explicit(d) | Self::Inferred(d) => Some(*d),
            Self::Default => None,
        }
    }
}

const CORE_REQUIREMENTS: [Requirement; 3] = [
    Requirement::new("gorm.io/gorm", "v1.25.7-0.20240204074919-46816ad31dde"),
    Requirement::new("github.com/spf13/viper", "v1.20.1"),
    Requirement::new("go.uber.org/fx", "v1.24.0"),
];

const BINDING: Binding = Binding {
    alias: "gormdb",
    package: "internal/platform/db/gorm",
    call: "gormdb.Module()",
};

pub struct GormModule {
    descriptor: ModuleDescriptor,
    template: ModuleTemplate,
    defaults: Option<ValueMap>,
    marker: &'static str,
}

impl GormModule {
    pub fn new(
        descriptor: ModuleDescriptor,
        template: ModuleTemplate,
        defaults_yaml: &str,
        marker: &'static str,
    ) -> Self {
        let defaults = parse_defaults(descriptor.name().as_str(), defaults_yaml);
        Self {
            descriptor,
            template,
            defaults,
            marker,
        }
    }
}

impl Module for GormModule {
    fn descriptor(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    fn applies(&self, ctx: &ModuleContext<'_>) -> bool {
        marker_absent(ctx, Some(self.marker))
    }

    fn defaults(&self) -> Option<ValueMap> {
        self.defaults.clone()
    }

    fn apply(&self, ctx: &mut ModuleContext<'_>) -> CraftResult<()> {
        let choice = DriverChoice::from_values(ctx.value_str("gorm.driver"), ctx.value_str("gorm.dsn"));
        let driver = choice.driver();
        info!(%driver, ?choice, "gorm driver selected");

        // the template imports gorm.io/driver/<gorm.driver>
        ctx.set_value("gorm.driver", driver.as_str())?;

        let mut requirements = CORE_REQUIREMENTS.to_vec();
        requirements.push(driver.requirement());
        add_requirements(ctx, &requirements);

        ctx.render_and_write(&self.template)?;
        wire(ctx, &BINDING)?;
        merge_config_defaults(ctx, self.descriptor.name().as_str())?;

        if let (Some(config), Some(driver)) = (ctx.config(), choice.persisted()) {
            config.set("gorm.driver", Value::from(driver.as_str()))?;
        }
        Ok(())
    }
}

impl fmt::Debug for GormModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GormModule")
            .field("name", self.descriptor.name())
            .finish()
    }
}
