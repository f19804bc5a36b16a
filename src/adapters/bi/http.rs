//! REST client for the BI service
//!
//! Resources live under `{endpoint}/accounts/{account}/{data-sets|analyses|dashboards}`.
//! An upsert is a describe (`GET`) followed by either a create (`POST` to the
//! collection) or an update (`PUT` to the item). Permissions are granted with
//! `PUT .../{id}/permissions`.

use super::traits::BiService;
use crate::adapters::http_client::{build_client, with_bearer};
use crate::config::{ProvisioningConfig, SecretString};
use crate::domain::ids::{AnalysisId, DashboardId, PrincipalArn};
use crate::domain::{
    ColumnType, DatasetDescriptor, ProvisionError, ProvisioningContext, ReportflowError,
    ResourceKind, Result, SourceEntity, UpsertOutcome,
};
use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use std::collections::BTreeMap;
use url::Url;

/// Physical table id used inside every dataset definition
const PHYSICAL_TABLE_ID: &str = "ReportTable";

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct DataSetRequest<'a> {
    data_set_id: &'a str,
    name: &'a str,
    import_mode: &'static str,
    physical_table_map: BTreeMap<&'static str, PhysicalTable<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct PhysicalTable<'a> {
    s3_source: S3Source<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct S3Source<'a> {
    data_source_arn: &'a str,
    input_columns: Vec<InputColumn<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct InputColumn<'a> {
    name: &'a str,
    #[serde(rename = "Type")]
    column_type: ColumnType,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct BoundResourceRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    analysis_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dashboard_id: Option<&'a str>,
    name: &'a str,
    source_entity: SourceEntityBody<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct SourceEntityBody<'a> {
    data_set_references: Vec<DataSetReference<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct DataSetReference<'a> {
    data_set_arn: &'a str,
    data_set_placeholder: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct PermissionsRequest<'a> {
    grant_permissions: Vec<Grant<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct Grant<'a> {
    principal: &'a str,
    actions: &'a [String],
}

impl<'a> BoundResourceRequest<'a> {
    fn new(kind: ResourceKind, id: &'a str, name: &'a str, source: &'a SourceEntity) -> Self {
        Self {
            analysis_id: (kind == ResourceKind::Analysis).then_some(id),
            dashboard_id: (kind == ResourceKind::Dashboard).then_some(id),
            name,
            source_entity: SourceEntityBody {
                data_set_references: vec![DataSetReference {
                    data_set_arn: source.dataset_arn.as_str(),
                    data_set_placeholder: &source.placeholder,
                }],
            },
        }
    }
}

/// BI service reached over HTTP
pub struct HttpBiService {
    endpoint: Url,
    client: Client,
    token: Option<SecretString>,
}

impl HttpBiService {
    /// Create a new BI client
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a non-absolute endpoint.
    pub fn new(endpoint: &str, token: Option<SecretString>, timeout_seconds: u64) -> Result<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            ReportflowError::Configuration(format!("Invalid BI endpoint '{endpoint}': {e}"))
        })?;
        if endpoint.cannot_be_a_base() {
            return Err(ReportflowError::Configuration(format!(
                "BI endpoint cannot be used as a base URL: {endpoint}"
            )));
        }

        Ok(Self {
            endpoint,
            client: build_client(timeout_seconds)?,
            token,
        })
    }

    pub fn from_config(config: &ProvisioningConfig) -> Result<Self> {
        Self::new(&config.endpoint, config.token.clone(), config.timeout_seconds)
    }

    fn url(&self, ctx: &ProvisioningContext, segments: &[&str]) -> Result<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ReportflowError::Configuration(format!(
                    "BI endpoint cannot be used as a base URL: {}",
                    self.endpoint
                ))
            })?
            .pop_if_empty()
            .push("accounts")
            .push(ctx.account_id().as_str())
            .extend(segments);
        Ok(url)
    }

    async fn send<B: Serialize + Sync>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
        resource: &str,
    ) -> Result<StatusCode> {
        tracing::debug!(method = %method, url = %url, "BI request");

        let mut request = with_bearer(self.client.request(method, url), self.token.as_ref());
        if let Some(body) = body {
            request = request.json(body);
        }

        let resp = request.send().await.map_err(|e| ProvisionError::Unavailable {
            resource: resource.to_string(),
            message: e.to_string(),
        })?;

        let status = resp.status();
        if status.is_success() || status == StatusCode::NOT_FOUND {
            return Ok(status);
        }

        let body = resp.text().await.unwrap_or_default();
        Err(map_status(status, body, resource).into())
    }

    /// Whether the resource already exists
    async fn exists(
        &self,
        ctx: &ProvisioningContext,
        kind: ResourceKind,
        id: &str,
    ) -> Result<bool> {
        let resource = resource_name(kind, id);
        let url = self.url(ctx, &[kind.path_segment(), id])?;
        let status = self.send::<()>(Method::GET, url, None, &resource).await?;
        Ok(status != StatusCode::NOT_FOUND)
    }

    async fn upsert<B: Serialize + Sync>(
        &self,
        ctx: &ProvisioningContext,
        kind: ResourceKind,
        id: &str,
        body: &B,
    ) -> Result<UpsertOutcome> {
        let resource = resource_name(kind, id);
        let (method, url, outcome) = if self.exists(ctx, kind, id).await? {
            (
                Method::PUT,
                self.url(ctx, &[kind.path_segment(), id])?,
                UpsertOutcome::Updated,
            )
        } else {
            (
                Method::POST,
                self.url(ctx, &[kind.path_segment()])?,
                UpsertOutcome::Created,
            )
        };

        let status = self.send(method, url, Some(body), &resource).await?;
        if status == StatusCode::NOT_FOUND {
            return Err(ProvisionError::UnexpectedResponse {
                resource,
                status: status.as_u16(),
                message: "resource disappeared during upsert".to_string(),
            }
            .into());
        }

        Ok(outcome)
    }
}

fn resource_name(kind: ResourceKind, id: &str) -> String {
    format!("{}/{}", kind.arn_type(), id)
}

fn map_status(status: StatusCode, message: String, resource: &str) -> ProvisionError {
    let resource = resource.to_string();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ProvisionError::PermissionDenied { resource, message }
        }
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            ProvisionError::InvalidDefinition { resource, message }
        }
        StatusCode::TOO_MANY_REQUESTS => ProvisionError::QuotaExceeded { resource, message },
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            ProvisionError::Unavailable { resource, message }
        }
        _ => ProvisionError::UnexpectedResponse {
            resource,
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl BiService for HttpBiService {
    async fn upsert_dataset(
        &self,
        ctx: &ProvisioningContext,
        dataset: &DatasetDescriptor,
    ) -> Result<UpsertOutcome> {
        let source_arn = ctx.s3_object_arn(&dataset.source)?;
        let columns = dataset
            .columns
            .iter()
            .map(|c| InputColumn {
                name: &c.name,
                column_type: c.column_type,
            })
            .collect();
        let mut physical_table_map = BTreeMap::new();
        physical_table_map.insert(
            PHYSICAL_TABLE_ID,
            PhysicalTable {
                s3_source: S3Source {
                    data_source_arn: source_arn.as_str(),
                    input_columns: columns,
                },
            },
        );
        let body = DataSetRequest {
            data_set_id: dataset.dataset_id.as_str(),
            name: &dataset.name,
            import_mode: "DIRECT",
            physical_table_map,
        };

        self.upsert(ctx, ResourceKind::Dataset, dataset.dataset_id.as_str(), &body)
            .await
    }

    async fn create_or_update_analysis(
        &self,
        ctx: &ProvisioningContext,
        analysis_id: &AnalysisId,
        name: &str,
        source: &SourceEntity,
    ) -> Result<UpsertOutcome> {
        let body =
            BoundResourceRequest::new(ResourceKind::Analysis, analysis_id.as_str(), name, source);
        self.upsert(ctx, ResourceKind::Analysis, analysis_id.as_str(), &body)
            .await
    }

    async fn create_or_update_dashboard(
        &self,
        ctx: &ProvisioningContext,
        dashboard_id: &DashboardId,
        name: &str,
        source: &SourceEntity,
    ) -> Result<UpsertOutcome> {
        let body =
            BoundResourceRequest::new(ResourceKind::Dashboard, dashboard_id.as_str(), name, source);
        self.upsert(ctx, ResourceKind::Dashboard, dashboard_id.as_str(), &body)
            .await
    }

    async fn grant_permissions(
        &self,
        ctx: &ProvisioningContext,
        kind: ResourceKind,
        resource_id: &str,
        principal: &PrincipalArn,
        actions: &[String],
    ) -> Result<()> {
        let resource = resource_name(kind, resource_id);
        let url = self.url(ctx, &[kind.path_segment(), resource_id, "permissions"])?;
        let body = PermissionsRequest {
            grant_permissions: vec![Grant {
                principal: principal.as_str(),
                actions,
            }],
        };

        let status = self.send(Method::PUT, url, Some(&body), &resource).await?;
        if status == StatusCode::NOT_FOUND {
            return Err(ProvisionError::UnexpectedResponse {
                resource,
                status: status.as_u16(),
                message: "cannot grant permissions on a missing resource".to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "http"
    }
}
