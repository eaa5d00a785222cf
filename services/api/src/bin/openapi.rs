//! services/api/src/bin/openapi.rs
//!
//! Dumps the OpenAPI 3.0 specification for the doclens REST API to
//! `openapi.json`, for clients that want the contract without a running
//! server.

use api_lib::web::ApiDoc;
use utoipa::OpenApi;

const SPEC_PATH: &str = "openapi.json";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let spec = ApiDoc::openapi().to_pretty_json()?;
    std::fs::write(SPEC_PATH, spec)?;
    println!("OpenAPI specification written to {SPEC_PATH}");
    Ok(())
}
