use aws_lambda_events::event::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use tracing::info;
use trip_handler::{Config, DynamoTripStore, TripHandler, TripRequest};

async fn function_handler(
    handler: &TripHandler<DynamoTripStore>,
    event: LambdaEvent<ApiGatewayProxyRequest>,
) -> Result<ApiGatewayProxyResponse, Error> {
    let (request, context) = event.into_parts();
    info!(request_id = %context.request_id, "Received API Gateway event");

    let response = handler.handle(TripRequest::from(request)).await;
    Ok(response.into())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .json()
        .init();

    let config = Config::from_env();
    let store = DynamoTripStore::from_config(&config).await;
    info!("Serving trips from table {}", store.table_name());

    let handler = TripHandler::new(store, config);

    run(service_fn(|event| function_handler(&handler, event))).await
}
