use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::airports::{dtos as airports_dtos, handlers as airports_handlers};
use crate::features::auth;
use crate::features::registry::{dtos as registry_dtos, handlers as registry_handlers};
use crate::features::reviews::{dtos as reviews_dtos, handlers as reviews_handlers};
use crate::features::search::{dtos as search_dtos, handlers as search_handlers, models as search_models};
use crate::features::shops::{dtos as shops_dtos, handlers as shops_handlers, models as shops_models};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::request_otp,
        auth::handlers::verify_otp,
        auth::handlers::sign_up,
        auth::handlers::login,
        auth::handlers::refresh_token,
        auth::handlers::get_me,
        // Airports (public)
        airports_handlers::list_airports,
        airports_handlers::get_airport,
        // Search (public)
        search_handlers::search_shops,
        search_handlers::shops_map,
        // Shops
        shops_handlers::get_shop,
        shops_handlers::get_my_shop,
        shops_handlers::create_shop,
        shops_handlers::update_shop,
        shops_handlers::delete_shop,
        shops_handlers::upload_photos,
        shops_handlers::delete_photo,
        // Reviews
        reviews_handlers::list_reviews,
        reviews_handlers::create_review,
        // Registry (public)
        registry_handlers::validate_tail_number,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth::model::AuthenticatedUser,
            auth::dtos::OtpRequestDto,
            auth::dtos::VerifyOtpRequestDto,
            auth::dtos::PasswordAuthRequestDto,
            auth::dtos::RefreshTokenRequestDto,
            auth::dtos::SessionResponseDto,
            auth::dtos::SignupResponseDto,
            auth::dtos::AuthUserDto,
            auth::dtos::MeResponseDto,
            ApiResponse<auth::dtos::SessionResponseDto>,
            ApiResponse<auth::dtos::SignupResponseDto>,
            ApiResponse<auth::dtos::MeResponseDto>,
            // Airports
            airports_dtos::AirportResponseDto,
            ApiResponse<airports_dtos::AirportResponseDto>,
            ApiResponse<Vec<airports_dtos::AirportResponseDto>>,
            // Search
            search_models::DistanceUnit,
            search_dtos::SearchResultDto,
            search_dtos::MapMarkerDto,
            search_dtos::MapCenterDto,
            search_dtos::MapResponseDto,
            ApiResponse<Vec<search_dtos::SearchResultDto>>,
            ApiResponse<search_dtos::MapResponseDto>,
            // Shops
            shops_models::ShopTier,
            shops_dtos::ShopRequestDto,
            shops_dtos::ShopResponseDto,
            shops_dtos::ShopDetailDto,
            shops_dtos::UploadPhotosDto,
            shops_dtos::DeletePhotoDto,
            ApiResponse<shops_dtos::ShopResponseDto>,
            ApiResponse<shops_dtos::ShopDetailDto>,
            // Reviews
            reviews_dtos::CreateReviewDto,
            reviews_dtos::ReviewResponseDto,
            ApiResponse<reviews_dtos::ReviewResponseDto>,
            ApiResponse<Vec<reviews_dtos::ReviewResponseDto>>,
            // Registry
            registry_dtos::ValidateTailNumberDto,
            registry_dtos::AircraftResponseDto,
            ApiResponse<registry_dtos::AircraftResponseDto>,
        )
    ),
    tags(
        (name = "auth", description = "Sign-in through the identity provider"),
        (name = "airports", description = "Airport lookup table (public)"),
        (name = "search", description = "Shop search and map (public)"),
        (name = "shops", description = "Shop profiles and photos"),
        (name = "reviews", description = "Shop reviews"),
        (name = "registry", description = "Aircraft registry lookup (simulated)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Fix-a-Plane API",
        version = "0.1.0",
        description = "API documentation for the Fix-a-Plane shop marketplace",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_core_paths_and_bearer_scheme() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/shops/search",
            "/api/shops/map",
            "/api/shops/{id}",
            "/api/shops/{id}/reviews",
            "/api/airports/{code}",
            "/api/registry/validate",
            "/api/auth/me",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
