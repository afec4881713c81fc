pub mod search;
pub mod version;

use crate::error::Result;

pub use search::SearchCommand;
pub use version::VersionCommand;

pub trait Command {
    fn execute(&self) -> Result<()>;
}
