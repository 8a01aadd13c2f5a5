pub mod local_fs;

pub use local_fs::LocalImageStore;
