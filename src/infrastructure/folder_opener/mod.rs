//! Folder opener adapters

mod system;

pub use system::SystemFolderOpener;
