//! hb-project: design project file format, catalogs and validation.

pub mod catalog;
pub mod schema;
pub mod validate;

use std::path::Path;

pub use catalog::Catalogs;
pub use schema::*;
pub use validate::{ValidationError, validate_project};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] hb_components::ComponentError),

    #[error("Unsupported project format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &Path) -> ProjectResult<DesignProject> {
    let content = std::fs::read_to_string(path)?;
    let project: DesignProject = serde_yaml::from_str(&content)?;
    validate_project(&project)?;
    Ok(project)
}

pub fn save_yaml(path: &Path, project: &DesignProject) -> ProjectResult<()> {
    validate_project(project)?;
    let content = serde_yaml::to_string(project)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<DesignProject> {
    let content = std::fs::read_to_string(path)?;
    let project: DesignProject = serde_json::from_str(&content)?;
    validate_project(&project)?;
    Ok(project)
}

pub fn save_json(path: &Path, project: &DesignProject) -> ProjectResult<()> {
    validate_project(project)?;
    let content = serde_json::to_string_pretty(project)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load a project, picking the format from the file extension.
pub fn load_project(path: &Path) -> ProjectResult<DesignProject> {
    match extension(path).as_str() {
        "yaml" | "yml" => load_yaml(path),
        "json" => load_json(path),
        other => Err(ProjectError::UnsupportedFormat {
            extension: other.to_string(),
        }),
    }
}

/// Save a project, picking the format from the file extension.
pub fn save_project(path: &Path, project: &DesignProject) -> ProjectResult<()> {
    match extension(path).as_str() {
        "yaml" | "yml" => save_yaml(path, project),
        "json" => save_json(path, project),
        other => Err(ProjectError::UnsupportedFormat {
            extension: other.to_string(),
        }),
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase()
}
