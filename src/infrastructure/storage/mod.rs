mod object_blob_store;
mod store_factory;

pub use object_blob_store::ObjectBlobStore;
pub use store_factory::BlobStoreFactory;
