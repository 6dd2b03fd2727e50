use actix_web::{get, http::StatusCode, web, HttpResponse};
use askama::Template;
use url::form_urlencoded;

use crate::{
    domain::search::{SearchParams, SearchResult},
    routes::lead_route::{status_for, LeadSearchQuery},
    services::{find_leads, GeminiClient},
};

#[derive(Debug, Clone, Copy, PartialEq)]
enum ViewMode {
    Grid,
    List,
}

impl ViewMode {
    fn from_query(view: Option<&str>) -> Self {
        match view {
            Some("list") => ViewMode::List,
            _ => ViewMode::Grid,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Grid => "grid",
            ViewMode::List => "list",
        }
    }
}

#[derive(Template)]
#[template(path = "search.html")]
struct SearchTemplate {
    location: String,
    niche: String,
    list_view: bool,
    result: Option<SearchResult>,
    error: Option<String>,
    retry_href: Option<String>,
    grid_href: Option<String>,
    list_href: Option<String>,
}

impl SearchTemplate {
    fn blank(location: &str, niche: &str) -> Self {
        SearchTemplate {
            location: location.to_string(),
            niche: niche.to_string(),
            list_view: false,
            result: None,
            error: None,
            retry_href: None,
            grid_href: None,
            list_href: None,
        }
    }

    fn with_result(mut self, params: &SearchParams, result: SearchResult) -> Self {
        self.grid_href = Some(build_search_href(params, ViewMode::Grid));
        self.list_href = Some(build_search_href(params, ViewMode::List));
        self.result = Some(result);
        self
    }
}

fn build_search_href(params: &SearchParams, view: ViewMode) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query
        .append_pair("location", &params.location)
        .append_pair("niche", &params.niche);
    if view == ViewMode::List {
        query.append_pair("view", view.as_str());
    }
    format!("/?{}", query.finish())
}

fn render(page: SearchTemplate, status: StatusCode) -> HttpResponse {
    match page.render() {
        Ok(html) => HttpResponse::build(status)
            .content_type("text/html; charset=utf-8")
            .body(html),
        Err(e) => {
            log::error!("Failed to render search page: {:?}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/")]
pub async fn search_page(
    gemini_client: web::Data<GeminiClient>,
    query: web::Query<LeadSearchQuery>,
) -> HttpResponse {
    if query.is_empty() {
        return render(SearchTemplate::blank("", ""), StatusCode::OK);
    }

    let view = ViewMode::from_query(query.view.as_deref());
    let mut page = SearchTemplate::blank(query.location(), query.niche());
    page.list_view = view == ViewMode::List;

    let params = match SearchParams::parse(query.location(), query.niche()) {
        Ok(params) => params,
        Err(e) => {
            page.error = Some(e.to_string());
            return render(page, StatusCode::BAD_REQUEST);
        }
    };

    match find_leads(&gemini_client, &params).await {
        Ok(result) => render(page.with_result(&params, result), StatusCode::OK),
        Err(e) => {
            page.error = Some(e.to_string());
            page.retry_href = Some(build_search_href(&params, view));
            render(page, status_for(&e))
        }
    }
}
