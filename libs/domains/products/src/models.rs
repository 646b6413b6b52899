//! Product entity and DTOs

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Maximum number of image files accepted per create/update request.
pub const MAX_IMAGES_PER_REQUEST: usize = 5;

/// A catalog product.
///
/// Image fields hold blob store references (e.g. `uploads/1724966400000img1.png`),
/// never raw bytes. `featured_image` is derived whenever it is not given
/// explicitly: the first image wins, and it is absent when there are no images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product ID (hex-encoded ObjectId, assigned on creation)
    #[serde(rename = "_id", alias = "id")]
    pub id: String,

    /// Stock keeping unit
    pub sku: String,

    /// Product name
    pub name: String,

    /// Units in stock
    pub quantity: i64,

    /// Product description
    pub description: String,

    /// References to stored image files
    pub images: Vec<String>,

    /// Reference to the image shown in listings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,

    /// Whether the product is marked as a favorite
    #[serde(default)]
    pub is_favorite: bool,
}

/// Input for creating a product.
///
/// Built by the HTTP layer from a multipart form after uploaded files
/// have been written to the blob store.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    pub sku: String,
    pub name: String,
    pub quantity: i64,
    pub description: String,
    /// Stored references for images uploaded with the form
    #[serde(default)]
    pub images: Vec<String>,
    /// Explicit featured image reference; falls back to the first image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
}

/// Input for updating a product.
///
/// Scalar fields always replace the stored values. `images: None` keeps
/// the existing image set; `Some(refs)` replaces it wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    pub sku: String,
    pub name: String,
    pub quantity: i64,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
}

/// Pick the featured image: an explicit choice wins, otherwise the first
/// of `images`, otherwise none.
fn derive_featured(explicit: Option<String>, images: &[String]) -> Option<String> {
    explicit.or_else(|| images.first().cloned())
}

impl Product {
    /// Create a new product from input, assigning a fresh ID.
    pub fn new(input: CreateProduct) -> Self {
        let featured_image = derive_featured(input.featured_image, &input.images);

        Self {
            id: ObjectId::new().to_hex(),
            sku: input.sku,
            name: input.name,
            quantity: input.quantity,
            description: input.description,
            images: input.images,
            featured_image,
            is_favorite: false,
        }
    }

    /// Apply an update in place.
    ///
    /// The favorite flag is untouched; it only changes through the
    /// dedicated toggle operation.
    pub fn apply_update(&mut self, input: UpdateProduct) {
        self.sku = input.sku;
        self.name = input.name;
        self.quantity = input.quantity;
        self.description = input.description;

        if let Some(images) = input.images {
            self.images = images;
        }
        self.featured_image = derive_featured(input.featured_image, &self.images);
    }
}
