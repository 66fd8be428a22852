use imager_profile::ImagerService;
use std::path::Path;
use tempfile::TempDir;

pub struct IntegrationHarness {
    workspace: TempDir,
}

impl IntegrationHarness {
    pub fn new() -> Self {
        let workspace = TempDir::new().expect("failed to create temp workspace");
        Self { workspace }
    }

    pub fn workspace_path(&self) -> &Path {
        self.workspace.path()
    }

    pub fn service(&self) -> ImagerService {
        ImagerService::open(self.workspace.path()).expect("failed to open ImagerService for tests")
    }
}

mod profile_active_view;
mod profile_provisioning;
mod profile_update;
pub mod support;
