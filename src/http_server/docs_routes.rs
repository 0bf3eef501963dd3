//! Documentation HTTP Routes
//!
//! The root path sends browsers to a Swagger UI explorer backed by a static
//! OpenAPI document describing the valve endpoints.

use axum::{
    http::header,
    response::{Html, IntoResponse, Redirect},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use crate::model::{DESCRIPTION_MAX_LEN, NAME_MAX_LEN, TYPE_MAX_LEN};

pub const SWAGGER_PATH: &str = "/openapi/swagger";
pub const OPENAPI_JSON_PATH: &str = "/openapi/openapi.json";

const SWAGGER_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>Valve Catalog API</title>
  <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.ui = SwaggerUIBundle({ url: "/openapi/openapi.json", dom_id: "#swagger-ui" });
  </script>
</body>
</html>
"##;

/// Create documentation routes
pub fn docs_routes() -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route(SWAGGER_PATH, get(swagger_handler))
        .route(OPENAPI_JSON_PATH, get(openapi_handler))
}

async fn home_handler() -> Redirect {
    Redirect::to(SWAGGER_PATH)
}

async fn swagger_handler() -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, "no-cache")],
        Html(SWAGGER_HTML),
    )
}

async fn openapi_handler() -> Json<Value> {
    Json(openapi_document())
}

fn valve_fields_schema() -> Value {
    json!({
        "name": { "type": "string", "maxLength": NAME_MAX_LEN, "example": "RETQ408BV" },
        "description": { "type": "string", "maxLength": DESCRIPTION_MAX_LEN, "example": "Block valve" },
        "type": { "type": "string", "maxLength": TYPE_MAX_LEN, "example": "Gate" },
        "flow_rate": { "type": "number", "example": 15200 }
    })
}

fn form_body(schema_ref: &str) -> Value {
    json!({
        "required": true,
        "content": {
            "application/x-www-form-urlencoded": {
                "schema": { "$ref": schema_ref }
            }
        }
    })
}

fn json_response(description: &str, schema_ref: &str) -> Value {
    json!({
        "description": description,
        "content": { "application/json": { "schema": { "$ref": schema_ref } } }
    })
}

/// OpenAPI 3 description of the valve endpoints.
pub fn openapi_document() -> Value {
    let fields = valve_fields_schema();
    let mut update_props = fields.clone();
    update_props["id"] = json!({ "type": "integer", "example": 1 });
    let mut view_props = update_props.clone();
    view_props["id"] = json!({ "type": "integer", "readOnly": true, "example": 1 });

    let error = "#/components/schemas/Error";
    let view = "#/components/schemas/ValveView";

    json!({
        "openapi": "3.0.3",
        "info": { "title": "Valve Catalog API", "version": env!("CARGO_PKG_VERSION") },
        "tags": [
            { "name": "Documentation", "description": "Documentation explorer: Swagger" },
            { "name": "Valve", "description": "Add, list, update and remove valves from the catalog" }
        ],
        "paths": {
            "/valve": {
                "post": {
                    "tags": ["Valve"],
                    "summary": "Add a new valve to the catalog",
                    "requestBody": form_body("#/components/schemas/Valve"),
                    "responses": {
                        "200": json_response("The stored valve", view),
                        "400": json_response("The valve could not be saved", error),
                        "409": json_response("A valve with the same name exists", error),
                        "422": json_response("Invalid form", error)
                    }
                },
                "put": {
                    "tags": ["Valve"],
                    "summary": "Replace every field of a valve, found by id",
                    "requestBody": form_body("#/components/schemas/ValveUpdate"),
                    "responses": {
                        "200": json_response("The updated valve", view),
                        "404": json_response("No valve with that id", error),
                        "409": json_response("A valve with the same name exists", error),
                        "422": json_response("Invalid form", error)
                    }
                },
                "delete": {
                    "tags": ["Valve"],
                    "summary": "Remove a valve by name",
                    "parameters": [{
                        "name": "name",
                        "in": "query",
                        "required": true,
                        "schema": { "type": "string", "example": "RETQ408BV" }
                    }],
                    "responses": {
                        "200": json_response("The valve was removed", "#/components/schemas/ValveDeleted"),
                        "404": json_response("No valve with that name", error)
                    }
                }
            },
            "/valves": {
                "get": {
                    "tags": ["Valve"],
                    "summary": "List every valve in the catalog",
                    "responses": {
                        "200": json_response("All valves", "#/components/schemas/ValveList")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Valve": {
                    "type": "object",
                    "required": ["name", "description", "type", "flow_rate"],
                    "properties": fields
                },
                "ValveUpdate": {
                    "type": "object",
                    "required": ["id", "name", "description", "type", "flow_rate"],
                    "properties": update_props
                },
                "ValveView": {
                    "type": "object",
                    "properties": view_props
                },
                "ValveList": {
                    "type": "object",
                    "properties": {
                        "valves": { "type": "array", "items": { "$ref": view } }
                    }
                },
                "ValveDeleted": {
                    "type": "object",
                    "properties": {
                        "message": { "type": "string" },
                        "name": { "type": "string" }
                    }
                },
                "Error": {
                    "type": "object",
                    "properties": {
                        "message": { "type": "string" },
                        "field": { "type": "string" }
                    }
                }
            }
        }
    })
}
