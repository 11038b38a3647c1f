//! Modcraft Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Modcraft
//! module composition tool, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          modcraft-cli (CLI)             │
//! │       list / add / new / config         │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │    (ModuleService, ModuleRegistry)      │
//! │   plan, then apply modules in order     │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │  Module, ModuleContext, Renderer, ...   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    modcraft-adapters (Infrastructure)   │
//! │ built-in modules, writers, file editors │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  resolution planner, value tree,        │
//! │  composition-root document              │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use modcraft_core::prelude::*;
//!
//! let mut registry = ModuleRegistry::new();
//! // registry.register(SomeModule::new());
//! let service = ModuleService::new(Arc::new(registry));
//!
//! let mut ctx = ModuleContext::new("./my-service");
//! service.apply_modules(&mut ctx, &["http:gin"]).unwrap();
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ApplyReport, ModuleInfo, ModuleRegistry, ModuleService,
        ports::{
            CompositionRootEditor, ConfigEditor, FsWriter, ManifestEditor, Module, ModuleContext,
            PostHook, Renderer,
        },
    };
    pub use crate::domain::{
        CompositionDocument, GeneratedFile, ModuleDescriptor, ModuleName, ModuleTemplate,
        ResolutionPlan, TemplateFile, Value, ValueMap,
    };
    pub use crate::error::{CraftError, CraftResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
