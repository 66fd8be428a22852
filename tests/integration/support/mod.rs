use imager_profile::{AccountEvent, AccountListener, ImagerService, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Makes every subsequent write of `table` fail by occupying its temporary
/// file path with a directory.
pub fn block_table_writes(table: &Path) -> PathBuf {
    let blocker = table.with_extension("json.tmp");
    fs::create_dir_all(&blocker).expect("failed to create blocker directory");
    blocker
}

pub fn block_profile_writes(service: &ImagerService) -> PathBuf {
    let table = service
        .paths
        .data_dir
        .join(&service.config.storage.profiles_file);
    block_table_writes(&table)
}

/// Subscriber that breaks the account table as soon as an account is
/// announced, so the registry cannot persist a rollback.
pub struct BlockAccountWrites {
    pub accounts_table: PathBuf,
}

impl AccountListener for BlockAccountWrites {
    fn name(&self) -> &'static str {
        "block-account-writes"
    }

    fn on_account_event(&self, event: &AccountEvent) -> Result<()> {
        if let AccountEvent::Created(_) = event {
            block_table_writes(&self.accounts_table);
        }
        Ok(())
    }
}
