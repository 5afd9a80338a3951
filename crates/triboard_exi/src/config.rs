use std::path::PathBuf;

use typed_builder::TypedBuilder;

/// Where a session keeps its backup store.
///
/// The session identifier is opaque: it only has to be unique per game so
/// that two games do not share a backup blob.
#[derive(Clone, Debug, TypedBuilder)]
pub struct BaseboardConfig {
    #[builder(default = PathBuf::from("."), setter(into))]
    pub user_dir: PathBuf,
    #[builder(setter(into))]
    pub session_id: String,
}

impl BaseboardConfig {
    pub fn backup_path(&self) -> PathBuf {
        self.user_dir.join(format!("tribackup_{}.bin", self.session_id))
    }
}
