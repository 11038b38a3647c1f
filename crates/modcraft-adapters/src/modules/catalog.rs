//! The modules that ship with modcraft.
//!
//! Templates live in `crates/modcraft-adapters/templates/<module>/` and are
//! compiled into the binary. Each entry below pairs a descriptor with its
//! files, go.mod requirements and composition-root binding.

use modcraft_core::{
    application::services::BASE_MODULE,
    domain::{ModuleDescriptor, ModuleName, ModuleTemplate, TemplateFile},
};

use super::gorm::GormModule;
use super::template_module::{Binding, Requirement, TemplateModule};

macro_rules! template_file {
    ($dir:literal, $path:literal) => {
        TemplateFile::new(
            $path,
            include_str!(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/templates/",
                $dir,
                "/",
                $path
            )),
        )
    };
}

macro_rules! defaults_yaml {
    ($dir:literal) => {
        include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/templates/",
            $dir,
            "/defaults.yml"
        ))
    };
}

const PROMETHEUS: Requirement = Requirement::new("github.com/prometheus/client_golang", "v1.19.1");

fn descriptor(
    name: &str,
    label: &str,
    summary: &str,
    tags: &[&str],
    conflicts: &[&str],
) -> ModuleDescriptor {
    let mut builder = ModuleDescriptor::builder(ModuleName::new(name))
        .label(label)
        .version("0.1.0")
        .summary(summary)
        .tags(tags.iter().map(|t| t.to_string()));
    if name != BASE_MODULE {
        builder = builder.requires(ModuleName::new(BASE_MODULE));
    }
    for conflict in conflicts {
        builder = builder.conflicts(ModuleName::new(*conflict));
    }
    builder.build()
}

pub fn platform_base() -> TemplateModule {
    let template = ModuleTemplate::new(BASE_MODULE)
        .with_file(template_file!("platform_base", "go.mod.tmpl"))
        .with_file(template_file!("platform_base", "README.md.tmpl"))
        .with_file(template_file!("platform_base", "cmd/__name__/main.go.tmpl"))
        .with_file(template_file!("platform_base", "config/config.yml.tmpl"))
        .with_file(template_file!("platform_base", "internal/core/entity/.gitkeep"))
        .with_file(template_file!("platform_base", "internal/core/ports/.gitkeep"))
        .with_file(template_file!("platform_base", "internal/core/service/.gitkeep"))
        .with_file(template_file!("platform_base", "internal/platform/config/config.go.tmpl"))
        .with_file(template_file!("platform_base", "internal/platform/di/root.go.tmpl"))
        .with_file(template_file!("platform_base", "internal/platform/logger/logger.go.tmpl"));

    TemplateModule::new(
        descriptor(
            BASE_MODULE,
            "Platform Base (Fx + Viper)",
            "Generates base clean-arch project (Fx DI, Viper config, logger, DI root)",
            &["platform", "base", "fx", "viper"],
            &[],
        ),
        template,
    )
    .with_marker("go.mod")
}

pub fn http_gin() -> TemplateModule {
    let template = ModuleTemplate::new("http:gin").with_file(template_file!(
        "http_gin",
        "internal/adapters/inbound/http/gin/server.go.tmpl"
    ));

    TemplateModule::new(
        descriptor(
            "http:gin",
            "HTTP Gin Server",
            "Adds a Gin HTTP server with /metrics, /healthz and common middlewares",
            &["http", "gin", "server"],
            &["http:chi"],
        ),
        template,
    )
    .with_requirement(Requirement::new("github.com/gin-gonic/gin", "v1.10.0"))
    .with_requirement(PROMETHEUS)
    .with_binding(Binding {
        alias: "httpgin",
        package: "internal/adapters/inbound/http/gin",
        call: "httpgin.Module()",
    })
    .with_defaults_yaml(defaults_yaml!("http_gin"))
    .with_marker("internal/adapters/inbound/http/gin/server.go")
}

pub fn http_chi() -> TemplateModule {
    let template = ModuleTemplate::new("http:chi").with_file(template_file!(
        "http_chi",
        "internal/adapters/inbound/http/chi/server.go.tmpl"
    ));

    TemplateModule::new(
        descriptor(
            "http:chi",
            "HTTP Chi Server",
            "Adds a Chi HTTP server with /metrics, /healthz and common middlewares",
            &["http", "chi", "server"],
            &["http:gin"],
        ),
        template,
    )
    .with_requirement(Requirement::new("github.com/go-chi/chi/v5", "v5.0.12"))
    .with_requirement(Requirement::new("github.com/google/uuid", "v1.6.0"))
    .with_requirement(PROMETHEUS)
    .with_binding(Binding {
        alias: "httpchi",
        package: "internal/adapters/inbound/http/chi",
        call: "httpchi.Module()",
    })
    .with_defaults_yaml(defaults_yaml!("http_chi"))
    .with_marker("internal/adapters/inbound/http/chi/server.go")
}

pub fn grpc_server() -> TemplateModule {
    let template = ModuleTemplate::new("grpc:server").with_file(template_file!(
        "grpc_server",
        "internal/adapters/inbound/grpc/server/server.go.tmpl"
    ));

    TemplateModule::new(
        descriptor(
            "grpc:server",
            "gRPC Server",
            "Adds a gRPC server with default Google health check service",
            &["grpc", "server"],
            &[],
        ),
        template,
    )
    .with_requirement(Requirement::new("google.golang.org/grpc", "v1.63.2"))
    .with_binding(Binding {
        alias: "grpcserver",
        package: "internal/adapters/inbound/grpc/server",
        call: "grpcserver.Module()",
    })
    .with_defaults_yaml(defaults_yaml!("grpc_server"))
    .with_marker("internal/adapters/inbound/grpc/server/server.go")
}

pub fn db_gorm() -> GormModule {
    let template = ModuleTemplate::new("db:gorm").with_file(template_file!(
        "db_gorm",
        "internal/platform/db/gorm/gorm.go.tmpl"
    ));

    GormModule::new(
        descriptor(
            "db:gorm",
            "GORM (multi-driver: postgres/mysql/sqlite)",
            "Adds GORM with runtime-selectable driver via config/env (postgres/mysql/sqlite)",
            &["db", "gorm", "orm"],
            &["db:postgres", "db:mysql"],
        ),
        template,
        defaults_yaml!("db_gorm"),
        "internal/platform/db/gorm/gorm.go",
    )
}

pub fn feature_gitignore() -> TemplateModule {
    TemplateModule::new(
        descriptor(
            "feature:gitignore",
            ".gitignore (Go project defaults)",
            "Adds a .gitignore suited for Go projects",
            &["feature", "git", "ignore"],
            &[],
        ),
        ModuleTemplate::new("feature:gitignore")
            .with_file(template_file!("feature_gitignore", ".gitignore.tmpl")),
    )
    .with_marker(".gitignore")
}

pub fn feature_makefile() -> TemplateModule {
    TemplateModule::new(
        descriptor(
            "feature:makefile",
            "Makefile (common dev tasks)",
            "Adds a Makefile with common targets (build, test, lint, run)",
            &["feature", "makefile", "devtools"],
            &[],
        ),
        ModuleTemplate::new("feature:makefile")
            .with_file(template_file!("feature_makefile", "Makefile.tmpl")),
    )
    .with_marker("Makefile")
}

pub fn feature_dockerfile() -> TemplateModule {
    TemplateModule::new(
        descriptor(
            "feature:dockerfile",
            "Dockerfile (multi-stage build)",
            "Adds a multi-stage Dockerfile producing a static distroless image",
            &["feature", "docker", "container"],
            &[],
        ),
        ModuleTemplate::new("feature:dockerfile")
            .with_file(template_file!("feature_dockerfile", "Dockerfile.tmpl")),
    )
    .with_marker("Dockerfile")
}
