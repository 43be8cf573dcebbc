//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the structure of their corresponding domain
//! types but live in the inbound adapter layer where framework concerns belong.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// A request field failed validation.
    #[schema(rename = "validation")]
    Validation,
    /// The request is malformed in a way the service cannot interpret.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The supplied credentials do not match a known account.
    #[schema(rename = "invalid_credentials")]
    InvalidCredentials,
    /// No valid session accompanied the request.
    #[schema(rename = "unauthenticated")]
    Unauthenticated,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request conflicts with existing state.
    #[schema(rename = "conflict")]
    Conflict,
    /// Route geometry failed structural or numeric validation.
    #[schema(rename = "malformed_geometry")]
    MalformedGeometry,
    /// The geo-engine replied with something the service cannot interpret.
    #[schema(rename = "upstream_protocol")]
    UpstreamProtocol,
    /// The geo-engine did not reply within the configured deadline.
    #[schema(rename = "upstream_timeout")]
    UpstreamTimeout,
    /// The backing key-value store is unreachable.
    #[schema(rename = "store_unavailable")]
    StoreUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// API error response payload with machine-readable code and human-readable
/// message.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "validation")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "route name must not be empty")]
    message: String,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn error_code_schema_has_expected_name() {
        let name = ErrorCodeSchema::name();
        // utoipa replaces :: with . in schema names
        assert_eq!(name, "crate.domain.ErrorCode");
    }

    #[test]
    fn error_schema_has_expected_fields() {
        let schema_json = schema_to_json::<ErrorSchema>();
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        assert!(
            schema_json.contains("message"),
            "schema should contain message field"
        );
        assert!(
            schema_json.contains("details"),
            "schema should contain details field"
        );
    }

    #[test]
    fn error_code_schema_variants_match_domain() {
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        for code in [
            "validation",
            "invalid_request",
            "invalid_credentials",
            "unauthenticated",
            "forbidden",
            "not_found",
            "conflict",
            "malformed_geometry",
            "upstream_protocol",
            "upstream_timeout",
            "store_unavailable",
            "internal_error",
        ] {
            assert!(schema_json.contains(code), "missing {code}");
        }
    }
}
