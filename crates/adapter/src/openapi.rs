// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! `OpenAPI` specification and `Swagger UI` endpoints

use axum::{Json, response::Html};
use utoipa::OpenApi;

use crate::docs::ApiDoc;

const SWAGGER_UI_VERSION: &str = "5.17.14";

/// `OpenAPI` specification endpoint
pub async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Swagger UI endpoint, rendering `/api-doc/openapi.json`
pub async fn swagger_ui() -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Blockchain Info Adapter</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@{SWAGGER_UI_VERSION}/swagger-ui.css" />
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@{SWAGGER_UI_VERSION}/swagger-ui-bundle.js"></script>
    <script>
        window.onload = function() {{
            SwaggerUIBundle({{
                url: '/api-doc/openapi.json',
                dom_id: '#swagger-ui',
                deepLinking: true
            }});
        }}
    </script>
</body>
</html>
"#
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn swagger_ui_points_at_openapi_document() {
        let Html(page) = swagger_ui().await;
        assert!(page.contains("/api-doc/openapi.json"));
        assert!(page.contains(SWAGGER_UI_VERSION));
    }

    #[tokio::test]
    async fn spec_endpoint_serves_api_doc() {
        let Json(doc) = openapi_spec().await;
        assert_eq!(doc.info.title, "Blockchain Info Adapter");
    }
}
