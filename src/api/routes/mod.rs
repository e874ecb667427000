pub mod analytics_routes;
