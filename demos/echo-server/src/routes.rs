//! Echo handlers.

use heron::prelude::*;
use serde_json::json;

/// Registers the echo routes.
pub fn register(server: &mut Server) {
    server
        .get("/test", hello)
        .get("/testQueryString", echo_query)
        .get("/testParams/:id/:name", echo_params)
        .post("/testBody", echo_body)
        .put("/testBody", echo_body)
        .delete("/testParams/:id/:name", echo_params);
}

async fn hello(_ctx: RequestContext, mut response: Response) -> HeronResult<Response> {
    response.send("hello")?;
    Ok(response)
}

async fn echo_query(ctx: RequestContext, mut response: Response) -> HeronResult<Response> {
    response.json(ctx.query())?;
    Ok(response)
}

async fn echo_params(ctx: RequestContext, mut response: Response) -> HeronResult<Response> {
    response.json(ctx.params())?;
    Ok(response)
}

async fn echo_body(ctx: RequestContext, mut response: Response) -> HeronResult<Response> {
    match ctx.body() {
        Some(body) => response.json(body)?,
        None => response.json(&json!({ "empty": true }))?,
    }
    Ok(response)
}
