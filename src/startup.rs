use std::net::TcpListener;

use actix_web::{dev::Server, middleware::Logger, web, App, HttpServer};

use crate::{
    routes::{default_route, lead_route, search_route},
    services::GeminiClient,
};

pub fn run(listener: TcpListener, gemini_client: GeminiClient) -> Result<Server, std::io::Error> {
    let gemini_client = web::Data::new(gemini_client);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .service(default_route::health)
            .service(search_route::search_page)
            .service(web::scope("/api").service(lead_route::get_leads))
            .app_data(gemini_client.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
