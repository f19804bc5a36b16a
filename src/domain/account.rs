//! Caller account context for BI provisioning and notification
//!
//! Resolved once at startup and passed explicitly to the provisioner and
//! dispatcher. All resource ARNs are derived here from typed ids.

use super::artifact::StoredObjectRef;
use super::descriptors::ResourceKind;
use super::errors::ReportflowError;
use super::ids::{AccountId, AnalysisId, DashboardId, DatasetId, Region, ResourceArn, TopicArn};
use super::result::Result;

/// Account and region every BI resource and topic lives in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningContext {
    account_id: AccountId,
    region: Region,
}

impl ProvisioningContext {
    pub fn new(account_id: AccountId, region: Region) -> Self {
        Self { account_id, region }
    }

    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    /// ARN of a BI resource, `arn:aws:quicksight:{region}:{account}:{type}/{id}`
    pub fn resource_arn(&self, kind: ResourceKind, id: &str) -> Result<ResourceArn> {
        ResourceArn::new(format!(
            "arn:aws:quicksight:{}:{}:{}/{}",
            self.region,
            self.account_id,
            kind.arn_type(),
            id
        ))
        .map_err(ReportflowError::Validation)
    }

    pub fn dataset_arn(&self, id: &DatasetId) -> Result<ResourceArn> {
        self.resource_arn(ResourceKind::Dataset, id.as_str())
    }

    pub fn analysis_arn(&self, id: &AnalysisId) -> Result<ResourceArn> {
        self.resource_arn(ResourceKind::Analysis, id.as_str())
    }

    pub fn dashboard_arn(&self, id: &DashboardId) -> Result<ResourceArn> {
        self.resource_arn(ResourceKind::Dashboard, id.as_str())
    }

    /// ARN of a stored object, `arn:aws:s3:::{location}/{key}`
    pub fn s3_object_arn(&self, object: &StoredObjectRef) -> Result<ResourceArn> {
        ResourceArn::new(format!("arn:aws:s3:::{}/{}", object.location, object.key))
            .map_err(ReportflowError::Validation)
    }

    /// ARN of a notification topic owned by this account
    pub fn topic_arn(&self, topic_name: &str) -> Result<TopicArn> {
        if topic_name.trim().is_empty() || topic_name.contains(':') {
            return Err(ReportflowError::Validation(format!(
                "Invalid topic name: '{topic_name}'"
            )));
        }
        TopicArn::new(format!(
            "arn:aws:sns:{}:{}:{}",
            self.region, self.account_id, topic_name
        ))
        .map_err(ReportflowError::Validation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::{LocationId, ObjectKey};

    fn context() -> ProvisioningContext {
        ProvisioningContext::new(
            AccountId::new("123456789012").unwrap(),
            Region::new("us-east-1").unwrap(),
        )
    }

    #[test]
    fn test_dataset_arn() {
        let arn = context()
            .dataset_arn(&DatasetId::new("report-dataset").unwrap())
            .unwrap();
        assert_eq!(
            arn.as_str(),
            "arn:aws:quicksight:us-east-1:123456789012:dataset/report-dataset"
        );
    }

    #[test]
    fn test_s3_object_arn() {
        let object = StoredObjectRef::new(
            LocationId::new("destinationbucket").unwrap(),
            ObjectKey::new("reports/sales.csv").unwrap(),
        );
        let arn = context().s3_object_arn(&object).unwrap();
        assert_eq!(arn.as_str(), "arn:aws:s3:::destinationbucket/reports/sales.csv");
    }

    #[test]
    fn test_topic_arn() {
        let arn = context().topic_arn("report_topic").unwrap();
        assert_eq!(arn.as_str(), "arn:aws:sns:us-east-1:123456789012:report_topic");
        assert!(context().topic_arn("").is_err());
        assert!(context().topic_arn("a:b").is_err());
    }
}
