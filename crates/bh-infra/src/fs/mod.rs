mod bundle_storage;

pub use bundle_storage::DirectoryBundleStorage;
