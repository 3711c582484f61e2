use clap::Parser;
use log::LevelFilter;

/// Command line arguments. Every option can also be set through the environment.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Generates GraphQL schema in `./schemas/cart.graphql` instead of starting the service.
    #[arg(long)]
    pub generate_schema: bool,

    /// MongoDB connection string.
    #[arg(long, env = "MONGODB_URI")]
    pub mongodb_uri: Option<String>,

    /// Name of the MongoDB database holding carts, products and users.
    #[arg(long, env = "DATABASE_NAME", default_value = "cart-database")]
    pub database_name: String,

    /// Port the GraphQL server listens on.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Maximum log level.
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LevelFilter,
}
