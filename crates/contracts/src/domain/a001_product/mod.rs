pub mod aggregate;
pub mod batch;
pub mod form;
pub mod status;

pub use aggregate::{Photo, Product, ProductCategory, ProductSnapshot};
pub use batch::{BatchStatusRequest, BatchStatusResponse, CreateProductsResponse};
pub use form::ProductForm;
pub use status::ProductStatus;
