use async_trait::async_trait;
use client_core::{
    map::{
        static_map::{Backdrop, StaticMapClient, StaticMapRequest},
        MapUnavailable, MapView, MapWidgetLoader,
    },
    MapCredentials,
};
use eframe::egui;

use super::{CanvasMap, DecodedBackdrop};

/// Builds the canvas map around a first backdrop for the initial view.
pub struct StaticMapLoader {
    client: StaticMapClient,
    width: u32,
    height: u32,
}

impl StaticMapLoader {
    pub fn new(client: StaticMapClient, width: u32, height: u32) -> Self {
        Self {
            client,
            width,
            height,
        }
    }
}

#[async_trait]
impl MapWidgetLoader for StaticMapLoader {
    type Widget = CanvasMap;

    async fn load(
        &self,
        credentials: &MapCredentials,
        initial: MapView,
    ) -> Result<CanvasMap, MapUnavailable> {
        let request = StaticMapRequest::for_view(&initial, self.width, self.height);
        let backdrop = self.client.fetch(credentials, request).await?;
        let decoded = decode_backdrop(backdrop)?;
        Ok(CanvasMap::new(
            initial,
            egui::vec2(self.width as f32, self.height as f32),
            Some(decoded),
        ))
    }
}

pub fn decode_backdrop(backdrop: Backdrop) -> Result<DecodedBackdrop, MapUnavailable> {
    let decoded = image::load_from_memory(&backdrop.bytes)
        .map_err(|err| MapUnavailable::ConstructionFailed(format!("backdrop image: {err}")))?;
    let rgba = decoded.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(DecodedBackdrop {
        request: backdrop.request,
        image: egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()),
    })
}
