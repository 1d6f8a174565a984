// Catalog client for the image registry service (Glance v1 API): listing
// images by name, deleting images and streaming a disk artifact up as a new
// image in a single request.

use crate::config::Endpoint;
use crate::error::handlers::{HttpErrorHandler, NetworkErrorHandler};
use crate::error::{PublishError, Result};
use crate::image::ImageDescriptor;
use crate::logging::Logger;
use crate::registry::transport::{authorized, AccessToken, CreateImage, ImageCatalog};
use async_trait::async_trait;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Body, Client, RequestBuilder, Response};
use serde::Deserialize;
use std::time::Instant;
use tokio_util::io::ReaderStream;

pub const IMAGES_PATH: &str = "/v1/images";

#[derive(Debug, Deserialize)]
struct ImageList {
    images: Vec<ImageDescriptor>,
}

#[derive(Debug, Deserialize)]
struct ImageEnvelope {
    image: ImageDescriptor,
}

#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    endpoint: Endpoint,
    output: Logger,
}

impl CatalogClient {
    pub fn new(client: Client, endpoint: Endpoint, output: Logger) -> Self {
        Self {
            client,
            endpoint,
            output,
        }
    }

    pub fn list_request(&self, name: &str, token: Option<&AccessToken>) -> Result<RequestBuilder> {
        let url = self.endpoint.url(IMAGES_PATH)?;
        Ok(authorized(self.client.get(url).query(&[("name", name)]), token))
    }

    pub fn delete_request(&self, id: &str, token: Option<&AccessToken>) -> Result<RequestBuilder> {
        let mut url = self.endpoint.url(IMAGES_PATH)?;
        url.path_segments_mut()
            .map_err(|_| PublishError::Validation(format!("Cannot build image URL for id {}", id)))?
            .push(id);
        Ok(authorized(self.client.delete(url), token))
    }

    /// Build the upload request. The artifact is opened here and owned by the
    /// body stream, so the handle is released when the request finishes either way.
    pub async fn create_request(&self, image: &CreateImage, token: Option<&AccessToken>) -> Result<RequestBuilder> {
        let url = self.endpoint.url(IMAGES_PATH)?;
        let file = tokio::fs::File::open(image.artifact.path())
            .await
            .map_err(|e| PublishError::io(image.artifact.path(), e))?;
        let body = Body::wrap_stream(ReaderStream::new(file));

        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/octet-stream")
            .header(CONTENT_LENGTH, image.size.to_string())
            .header("x-image-meta-size", image.size.to_string())
            .header("x-image-meta-name", image.name.as_str())
            .header("x-image-meta-disk-format", image.disk_format.as_str())
            .header("x-image-meta-container-format", image.container_format.as_str())
            .header("x-image-meta-is-public", if image.is_public { "true" } else { "false" })
            .header("x-image-meta-property-distro", image.distro.as_str())
            .body(body);

        Ok(authorized(request, token))
    }

    async fn send(&self, request: RequestBuilder, context: &str) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| NetworkErrorHandler::handle_network_error(&e, context))?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error response".to_string());
        Err(HttpErrorHandler::handle_catalog_error(status, &error_text, context))
    }
}

#[async_trait]
impl ImageCatalog for CatalogClient {
    async fn list_images(&self, name: &str, token: Option<&AccessToken>) -> Result<Vec<ImageDescriptor>> {
        self.output
            .trace(&format!("Listing images with params = {{\"name\":\"{}\"}}...", name));

        let response = self.send(self.list_request(name, token)?, "image listing").await?;
        let list: ImageList = response
            .json()
            .await
            .map_err(|e| NetworkErrorHandler::handle_network_error(&e, "image listing"))?;

        self.output.trace("Listing done.");
        Ok(list.images)
    }

    async fn delete_image(&self, id: &str, token: Option<&AccessToken>) -> Result<()> {
        self.output.trace(&format!("Removing image with id = {}...", id));
        self.send(self.delete_request(id, token)?, "image removal").await?;
        self.output.trace("Image removed.");
        Ok(())
    }

    async fn create_image(&self, image: &CreateImage, token: Option<&AccessToken>) -> Result<ImageDescriptor> {
        self.output.trace(&format!(
            "Disk format: {}, container format: {}, public: {}, size: {}.",
            image.disk_format, image.container_format, image.is_public, image.size
        ));

        let request = self.create_request(image, token).await?;

        self.output
            .progress(&format!("Uploading {}", self.output.format_size(image.size)));
        let start_time = Instant::now();

        let response = self.send(request, "image upload").await?;

        let elapsed = start_time.elapsed();
        let speed = if elapsed.as_secs() > 0 {
            image.size / elapsed.as_secs()
        } else {
            image.size
        };
        self.output.progress_done();
        self.output.detail(&format!(
            "Upload completed in {} (avg speed: {})",
            self.output.format_duration(elapsed),
            self.output.format_speed(speed)
        ));

        let envelope: ImageEnvelope = response
            .json()
            .await
            .map_err(|e| NetworkErrorHandler::handle_network_error(&e, "image upload"))?;
        Ok(envelope.image)
    }
}
