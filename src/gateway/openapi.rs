//! OpenAPI documentation
//!
//! Served as JSON at `/api-docs/openapi.json`.

use utoipa::OpenApi;

use crate::account::{NewUserRequest, User, UserUpdateRequest};
use crate::gateway::handlers::HealthResponse;
use crate::gateway::handlers::user::DeletedUser;
use crate::transfer::{Transfer, TransferRequest, TransferView};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bank Transfers API",
        version = "0.1.0",
        description = "Users with balances and atomic transfers between them.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health::health_check,
        crate::gateway::handlers::user::list_users,
        crate::gateway::handlers::user::create_user,
        crate::gateway::handlers::user::update_user,
        crate::gateway::handlers::user::delete_user,
        crate::gateway::handlers::transfer::create_transfer,
        crate::gateway::handlers::transfer::list_transfers,
    ),
    components(schemas(
        HealthResponse,
        User,
        NewUserRequest,
        UserUpdateRequest,
        DeletedUser,
        Transfer,
        TransferRequest,
        TransferView,
    )),
    tags(
        (name = "System", description = "Health"),
        (name = "User", description = "User records and balances"),
        (name = "Transfer", description = "Money transfers and ledger"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_core_paths() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_value(&doc).unwrap();
        let paths = json["paths"].as_object().unwrap();
        assert!(paths.contains_key("/transferencia"));
        assert!(paths.contains_key("/transferencias"));
        assert!(paths.contains_key("/usuario"));
        assert!(paths.contains_key("/usuarios"));
    }
}
