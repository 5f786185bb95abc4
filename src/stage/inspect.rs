// ABOUTME: Project inspection: what can the staged source actually deploy as?
// ABOUTME: Picks the compose manifest over a bare Dockerfile when both exist.

use std::path::Path;

/// Strategy for bringing the application up on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Multi-container topology from a compose manifest.
    Compose,
    /// Build one image from the Dockerfile and run it.
    SingleContainer,
}

/// What the staged tree's root offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectProbe {
    pub has_build_recipe: bool,
    pub has_compose_manifest: bool,
}

const BUILD_RECIPE: &str = "Dockerfile";
const COMPOSE_MANIFESTS: [&str; 2] = ["docker-compose.yml", "docker-compose.yaml"];

impl ProjectProbe {
    /// Inspect a staged source tree's root directory.
    pub fn detect(source_dir: &Path) -> Self {
        Self {
            has_build_recipe: source_dir.join(BUILD_RECIPE).is_file(),
            has_compose_manifest: COMPOSE_MANIFESTS
                .iter()
                .any(|name| source_dir.join(name).is_file()),
        }
    }

    /// Select a strategy, compose preferred. None means nothing to deploy.
    pub fn strategy(&self) -> Option<Strategy> {
        if self.has_compose_manifest {
            Some(Strategy::Compose)
        } else if self.has_build_recipe {
            Some(Strategy::SingleContainer)
        } else {
            None
        }
    }
}
