// CloudWatch gateway implementation over the awsJson1.0 protocol
use crate::application::metrics_gateway::{
    DashboardValidationMessage, GatewayError, MetricsGateway, PutMetricData,
};
use crate::infrastructure::cloudwatch_mapper::{
    put_metric_data_to_wire, validation_message_from_wire, ErrorReply, GetDashboardInput,
    GetDashboardOutput, PutDashboardInput, PutDashboardOutput,
};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;

const TARGET_PREFIX: &str = "GraniteServiceVersion20100801";
const AMZ_JSON_1_0: &str = "application/x-amz-json-1.0";

/// Request signing is left to the endpoint (e.g. a SigV4 proxy); an optional
/// bearer token is attached for endpoints that want one.
#[derive(Debug, Clone)]
pub struct CloudWatchGateway {
    endpoint: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl CloudWatchGateway {
    pub fn new(endpoint: String, token: Option<String>) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token,
            client: reqwest::Client::new(),
        }
    }

    async fn call<I, O>(&self, action: &str, input: &I) -> Result<O, GatewayError>
    where
        I: Serialize + Sync + ?Sized,
        O: DeserializeOwned,
    {
        let payload = serde_json::to_vec(input)
            .with_context(|| format!("Failed to encode {} request", action))?;

        let mut request = self
            .client
            .post(format!("{}/", self.endpoint))
            .header("X-Amz-Target", format!("{}.{}", TARGET_PREFIX, action))
            .header(CONTENT_TYPE, AMZ_JSON_1_0)
            .body(payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to send {} request to CloudWatch", action))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read {} response from CloudWatch", action))?;

        if !status.is_success() {
            return Err(Self::error_from_reply(status.as_u16(), &body));
        }

        // Actions without output may answer with an empty body
        let body = if body.trim().is_empty() { "{}" } else { body.as_str() };
        let output = serde_json::from_str(body)
            .with_context(|| format!("Failed to parse {} response from CloudWatch", action))?;

        Ok(output)
    }

    fn error_from_reply(status: u16, body: &str) -> GatewayError {
        let reply: ErrorReply = serde_json::from_str(body).unwrap_or_default();
        let code = reply.code().to_string();
        let message = reply.message.unwrap_or_else(|| body.to_string());

        if code == "ResourceNotFound" || status == 404 {
            GatewayError::NotFound(message)
        } else {
            GatewayError::Api {
                status,
                code,
                message,
            }
        }
    }
}

#[async_trait]
impl MetricsGateway for CloudWatchGateway {
    async fn get_dashboard(&self, dashboard_name: &str) -> Result<String, GatewayError> {
        let output: GetDashboardOutput = self
            .call("GetDashboard", &GetDashboardInput { dashboard_name })
            .await?;

        Ok(output.dashboard_body.unwrap_or_default())
    }

    async fn put_dashboard(
        &self,
        dashboard_name: &str,
        dashboard_body: &str,
    ) -> Result<Vec<DashboardValidationMessage>, GatewayError> {
        let input = PutDashboardInput {
            dashboard_name,
            dashboard_body,
        };
        let output: PutDashboardOutput = self.call("PutDashboard", &input).await?;

        Ok(output
            .dashboard_validation_messages
            .into_iter()
            .map(validation_message_from_wire)
            .collect())
    }

    async fn put_metric_data(&self, request: PutMetricData) -> Result<(), GatewayError> {
        let _: IgnoredAny = self
            .call("PutMetricData", &put_metric_data_to_wire(request))
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::metrics_gateway::{MetricDatum, StandardUnit};
    use crate::domain::metric_data::DimensionKeyPair;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn target(action: &str) -> String {
        format!("GraniteServiceVersion20100801.{}", action)
    }

    #[tokio::test]
    async fn test_get_dashboard() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .and(header("x-amz-target", target("GetDashboard").as_str()))
            .and(header("content-type", "application/x-amz-json-1.0"))
            .and(body_json(json!({"DashboardName": "someDashboardName"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "DashboardArn": "arn:aws:cloudwatch::123456789012:dashboard/someDashboardName",
                "DashboardBody": "{\"widgets\":[]}",
                "DashboardName": "someDashboardName"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = CloudWatchGateway::new(server.uri(), None);

        let body = gateway.get_dashboard("someDashboardName").await.unwrap();
        assert_eq!(body, "{\"widgets\":[]}");
    }

    #[tokio::test]
    async fn test_bearer_token_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"DashboardBody": "{}"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let gateway = CloudWatchGateway::new(format!("{}/", server.uri()), Some("secret".to_string()));

        assert_eq!(gateway.get_dashboard("someDashboardName").await.unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_missing_dashboard_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "__type": "com.amazonaws.cloudwatch#ResourceNotFound",
                "message": "Dashboard someDashboardName does not exist"
            })))
            .mount(&server)
            .await;

        let gateway = CloudWatchGateway::new(server.uri(), None);

        let err = gateway.get_dashboard("someDashboardName").await.unwrap_err();
        match err {
            GatewayError::NotFound(message) => {
                assert_eq!(message, "Dashboard someDashboardName does not exist")
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_resource_not_found_code_wins_over_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "__type": "ResourceNotFound",
                "Message": "gone"
            })))
            .mount(&server)
            .await;

        let gateway = CloudWatchGateway::new(server.uri(), None);

        let err = gateway.get_dashboard("someDashboardName").await.unwrap_err();
        assert!(matches!(err, GatewayError::NotFound(message) if message == "gone"));
    }

    #[tokio::test]
    async fn test_other_errors_are_api_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "__type": "com.amazonaws.cloudwatch#InternalServiceError",
                "message": "Test exception. IGNORE!"
            })))
            .mount(&server)
            .await;

        let gateway = CloudWatchGateway::new(server.uri(), None);

        let err = gateway.get_dashboard("someDashboardName").await.unwrap_err();
        match err {
            GatewayError::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 500);
                assert_eq!(code, "InternalServiceError");
                assert_eq!(message, "Test exception. IGNORE!");
            }
            other => panic!("expected Api, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreadable_error_body_is_kept_as_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
            .mount(&server)
            .await;

        let gateway = CloudWatchGateway::new(server.uri(), None);

        let err = gateway.get_dashboard("someDashboardName").await.unwrap_err();
        assert!(matches!(
            err,
            GatewayError::Api { status: 503, ref message, .. } if message == "Service Unavailable"
        ));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        // Nothing listens on port 1
        let gateway = CloudWatchGateway::new("http://127.0.0.1:1".to_string(), None);

        let err = gateway.get_dashboard("someDashboardName").await.unwrap_err();
        assert!(matches!(err, GatewayError::Transport(_)));
    }

    #[tokio::test]
    async fn test_put_dashboard_returns_validation_messages() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("x-amz-target", target("PutDashboard").as_str()))
            .and(body_json(json!({
                "DashboardName": "someDashboardName",
                "DashboardBody": "{\"widgets\":[]}"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "DashboardValidationMessages": [
                    {"DataPath": "/widgets/0/properties", "Message": "Should NOT have additional properties"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = CloudWatchGateway::new(server.uri(), None);

        let messages = gateway
            .put_dashboard("someDashboardName", "{\"widgets\":[]}")
            .await
            .unwrap();
        assert_eq!(
            messages,
            vec![DashboardValidationMessage {
                data_path: Some("/widgets/0/properties".to_string()),
                message: "Should NOT have additional properties".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_put_metric_data() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("x-amz-target", target("PutMetricData").as_str()))
            .and(body_json(json!({
                "Namespace": "someNamespace",
                "MetricData": [{
                    "MetricName": "somePrefixsomeMetric",
                    "Dimensions": [{"Name": "someDimension", "Value": "dimensionValue"}],
                    "Unit": "Count",
                    "Value": 10.0
                }]
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = CloudWatchGateway::new(server.uri(), None);
        let request = PutMetricData {
            namespace: "someNamespace".to_string(),
            metric_data: vec![MetricDatum {
                metric_name: "somePrefixsomeMetric".to_string(),
                unit: StandardUnit::Count,
                value: 10.0,
                dimensions: vec![DimensionKeyPair::new("someDimension", "dimensionValue")],
            }],
        };

        gateway.put_metric_data(request).await.unwrap();
    }
}
