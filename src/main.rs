use std::{error::Error, fs, fs::File, io::Write, sync::Arc};

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::GraphQL;
use axum::{
    response::{self, IntoResponse},
    routing::get,
    Router,
};
use clap::Parser;
use log::info;
use mongodb::{options::ClientOptions, Client, Database};
use simple_logger::SimpleLogger;

use cart_service::{
    config::Args,
    graphql::{build_schema, sdl},
    service::{CartService, ProductService, UserService},
    store::mongo::{MongoCartStore, MongoCatalog, MongoUserStore},
};

/// Builds the GraphiQL frontend.
async fn graphiql() -> impl IntoResponse {
    response::Html(GraphiQLSource::build().endpoint("/").finish())
}

/// Establishes database connection and returns the client.
async fn db_connection(uri: &str) -> Result<Client, mongodb::error::Error> {
    // Parse a connection string into an options struct.
    let mut client_options = ClientOptions::parse(uri).await?;

    client_options.app_name = Some("Cart".to_string());

    // Get a handle to the deployment.
    Client::with_options(client_options)
}

/// Activates logger and parses arguments for optional schema generation. Otherwise starts the GraphQL server.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    SimpleLogger::new().with_level(args.log_level).init()?;

    if args.generate_schema {
        fs::create_dir_all("./schemas")?;
        let mut file = File::create("./schemas/cart.graphql")?;
        file.write_all(sdl().as_bytes())?;
        info!("GraphQL schema: ./schemas/cart.graphql was successfully generated!");
    } else {
        start_service(&args).await?;
    }
    Ok(())
}

/// Starts cart service on the configured port.
async fn start_service(args: &Args) -> Result<(), Box<dyn Error>> {
    let uri = args
        .mongodb_uri
        .as_deref()
        .ok_or("$MONGODB_URI is not set.")?;
    let client = db_connection(uri).await?;
    let db_client: Database = client.database(&args.database_name);

    let user_store = MongoUserStore::new(&db_client);
    user_store.ensure_indexes().await?;
    let catalog = Arc::new(MongoCatalog::new(&db_client));

    let schema = build_schema(
        CartService::new(Arc::new(MongoCartStore::new(&db_client)), catalog.clone()),
        UserService::new(Arc::new(user_store)),
        ProductService::new(catalog),
    );

    let app = Router::new().route("/", get(graphiql).post_service(GraphQL::new(schema)));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port)).await?;
    info!("GraphiQL IDE: http://0.0.0.0:{}", args.port);
    axum::serve(listener, app).await?;
    Ok(())
}
