//! Backend routing registry
//!
//! Maps each evidence modality to its analysis backend: base URL, route,
//! outbound request shape, and the normalizer for that backend's response
//! dialect. The table is closed and built once at startup; adding a modality
//! means adding a descriptor row here and nowhere else.

use crate::models::Modality;
use crate::services::normalizer::ResponseNormalizer;
use safepay_common::config::GatewayConfig;
use thiserror::Error;

/// Registry lookup errors
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No backend descriptor for the modality (500, indicates a table bug)
    #[error("No backend registered for modality: {0}")]
    UnknownModality(Modality),
}

/// Shape of the outbound request a backend expects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestShape {
    /// JSON object with a single string field
    Json { field: &'static str },
    /// Multipart form with a single file part
    Multipart { field: &'static str },
}

impl RequestShape {
    /// The JSON field or multipart part name the backend reads
    pub fn field(self) -> &'static str {
        match self {
            RequestShape::Json { field } | RequestShape::Multipart { field } => field,
        }
    }
}

/// One analysis backend: where evidence goes and in what form
#[derive(Debug, Clone)]
pub struct BackendDescriptor {
    /// Modality this backend serves
    pub modality: Modality,
    /// Backend base URL (scheme, host, port)
    pub base_url: String,
    /// Route under the base URL
    pub route: &'static str,
    /// Outbound request shape
    pub request: RequestShape,
    /// Which dialect the response is read in
    pub normalizer: ResponseNormalizer,
}

impl BackendDescriptor {
    /// Full URL for the backend call
    pub fn url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.route)
    }
}

/// Closed table of backend descriptors
///
/// The image row is the first leg of a two-step path: OCR extraction yields
/// text, which is then re-dispatched through the text row. Its normalizer
/// names the dialect of the verdict that ultimately answers the request.
pub struct BackendRegistry {
    descriptors: Vec<BackendDescriptor>,
}

impl BackendRegistry {
    /// Build the routing table from resolved configuration
    pub fn from_config(config: &GatewayConfig) -> Self {
        let descriptors = vec![
            BackendDescriptor {
                modality: Modality::Voice,
                base_url: config.voice_analysis_url.clone(),
                route: "/analyze-voice",
                request: RequestShape::Json {
                    field: "transcript",
                },
                normalizer: ResponseNormalizer::Voice,
            },
            BackendDescriptor {
                modality: Modality::Text,
                base_url: config.document_service_url.clone(),
                route: "/predict-text",
                request: RequestShape::Json { field: "text" },
                normalizer: ResponseNormalizer::Text,
            },
            BackendDescriptor {
                modality: Modality::Image,
                base_url: config.document_service_url.clone(),
                route: "/ocr-extract",
                request: RequestShape::Multipart { field: "image" },
                normalizer: ResponseNormalizer::Text,
            },
            BackendDescriptor {
                modality: Modality::Video,
                base_url: config.media_service_url.clone(),
                route: "/analyze-video",
                request: RequestShape::Multipart {
                    field: "video_file",
                },
                normalizer: ResponseNormalizer::Video,
            },
            BackendDescriptor {
                modality: Modality::Screenshot,
                base_url: config.media_service_url.clone(),
                route: "/analyze-whatsapp",
                request: RequestShape::Multipart {
                    field: "screenshot",
                },
                normalizer: ResponseNormalizer::Screenshot,
            },
        ];

        Self { descriptors }
    }

    /// Look up the backend descriptor for a modality.
    ///
    /// Pure table lookup, no I/O. The error arm cannot fire with the fixed
    /// table above; it exists so a future half-added modality fails loudly
    /// instead of panicking.
    pub fn resolve(&self, modality: Modality) -> Result<&BackendDescriptor, RegistryError> {
        self.descriptors
            .iter()
            .find(|d| d.modality == modality)
            .ok_or(RegistryError::UnknownModality(modality))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_registry() -> BackendRegistry {
        BackendRegistry::from_config(&GatewayConfig::default())
    }

    #[test]
    fn test_every_modality_resolves() {
        let registry = test_registry();
        for modality in Modality::ALL {
            assert!(
                registry.resolve(modality).is_ok(),
                "no descriptor for {modality}"
            );
        }
    }

    #[test]
    fn test_voice_row() {
        let registry = test_registry();
        let descriptor = registry.resolve(Modality::Voice).unwrap();
        assert_eq!(descriptor.route, "/analyze-voice");
        assert_eq!(
            descriptor.request,
            RequestShape::Json {
                field: "transcript"
            }
        );
        assert_eq!(descriptor.normalizer, ResponseNormalizer::Voice);
        assert_eq!(descriptor.url(), "http://localhost:8082/analyze-voice");
    }

    #[test]
    fn test_image_routes_to_ocr_then_normalizes_as_text() {
        let registry = test_registry();
        let descriptor = registry.resolve(Modality::Image).unwrap();
        assert_eq!(descriptor.route, "/ocr-extract");
        assert_eq!(descriptor.request, RequestShape::Multipart { field: "image" });
        assert_eq!(descriptor.normalizer, ResponseNormalizer::Text);
    }

    #[test]
    fn test_media_rows_use_expected_part_names() {
        let registry = test_registry();
        let video = registry.resolve(Modality::Video).unwrap();
        assert_eq!(video.request.field(), "video_file");
        let screenshot = registry.resolve(Modality::Screenshot).unwrap();
        assert_eq!(screenshot.request.field(), "screenshot");
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let config = GatewayConfig {
            voice_analysis_url: "http://voice.test:9000/".to_string(),
            ..GatewayConfig::default()
        };
        let registry = BackendRegistry::from_config(&config);
        let descriptor = registry.resolve(Modality::Voice).unwrap();
        assert_eq!(descriptor.url(), "http://voice.test:9000/analyze-voice");
    }
}
