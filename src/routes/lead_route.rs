use actix_web::{get, http::StatusCode, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::{
    domain::search::{QueryError, SearchParams},
    services::{find_leads, GeminiClient},
};

#[derive(Deserialize)]
pub struct LeadSearchQuery {
    pub location: Option<String>,
    pub niche: Option<String>,
    pub view: Option<String>,
}

impl LeadSearchQuery {
    pub fn is_empty(&self) -> bool {
        self.location.is_none() && self.niche.is_none()
    }

    pub fn location(&self) -> &str {
        self.location.as_deref().unwrap_or_default()
    }

    pub fn niche(&self) -> &str {
        self.niche.as_deref().unwrap_or_default()
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    kind: &'a str,
    message: String,
}

pub fn status_for(error: &QueryError) -> StatusCode {
    match error {
        QueryError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        QueryError::Unknown(_) => StatusCode::BAD_GATEWAY,
    }
}

#[get("/leads")]
pub async fn get_leads(
    gemini_client: web::Data<GeminiClient>,
    query: web::Query<LeadSearchQuery>,
) -> HttpResponse {
    let params = match SearchParams::parse(query.location(), query.niche()) {
        Ok(params) => params,
        Err(e) => {
            return HttpResponse::BadRequest().json(ErrorBody {
                kind: "invalid_input",
                message: e.to_string(),
            })
        }
    };

    match find_leads(&gemini_client, &params).await {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) => HttpResponse::build(status_for(&e)).json(ErrorBody {
            kind: e.kind(),
            message: e.to_string(),
        }),
    }
}
