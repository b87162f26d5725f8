//! Stable identifiers for rules, finding codes, and rule packages.
//!
//! `rule_id` is a dotted namespace whose first segment is the package. `code` is a short
//! snake_case discriminator.

// Packages
pub const PACKAGE_ALL: &str = "all";
pub const PACKAGE_S3: &str = "s3";
pub const PACKAGE_AUDIT: &str = "audit";
pub const PACKAGE_DATA: &str = "data";
pub const PACKAGE_COMPUTE: &str = "compute";
pub const PACKAGE_KMS: &str = "kms";

// Rules
pub const RULE_S3_BUCKET_ENCRYPTION: &str = "s3.bucket_encryption";
pub const RULE_S3_BUCKET_VERSIONING: &str = "s3.bucket_versioning";
pub const RULE_S3_BUCKET_LOGGING: &str = "s3.bucket_logging";
pub const RULE_S3_PUBLIC_ACCESS_BLOCK: &str = "s3.public_access_block";
pub const RULE_AUDIT_CLOUDTRAIL_PRESENT: &str = "audit.cloudtrail_present";
pub const RULE_AUDIT_CLOUDTRAIL_MULTI_REGION: &str = "audit.cloudtrail_multi_region";
pub const RULE_AUDIT_CLOUDTRAIL_LOG_VALIDATION: &str = "audit.cloudtrail_log_validation";
pub const RULE_AUDIT_CONFIG_RECORDER_PRESENT: &str = "audit.config_recorder_present";
pub const RULE_AUDIT_LOG_GROUP_RETENTION: &str = "audit.log_group_retention";
pub const RULE_DATA_RDS_ENCRYPTION: &str = "data.rds_encryption";
pub const RULE_DATA_RDS_BACKUP_RETENTION: &str = "data.rds_backup_retention";
pub const RULE_DATA_SQS_ENCRYPTION: &str = "data.sqs_encryption";
pub const RULE_COMPUTE_EBS_ENCRYPTION: &str = "compute.ebs_encryption";
pub const RULE_COMPUTE_INSTANCE_MONITORING: &str = "compute.instance_monitoring";
pub const RULE_COMPUTE_SSH_INGRESS: &str = "compute.ssh_ingress";
pub const RULE_KMS_KEY_ROTATION: &str = "kms.key_rotation";

// Codes: s3
pub const CODE_BUCKET_UNENCRYPTED: &str = "bucket_unencrypted";
pub const CODE_VERSIONING_DISABLED: &str = "versioning_disabled";
pub const CODE_ACCESS_LOGGING_DISABLED: &str = "access_logging_disabled";
pub const CODE_PUBLIC_ACCESS_NOT_BLOCKED: &str = "public_access_not_blocked";

// Codes: audit
pub const CODE_TRAIL_MISSING: &str = "trail_missing";
pub const CODE_TRAIL_SINGLE_REGION: &str = "trail_single_region";
pub const CODE_LOG_VALIDATION_DISABLED: &str = "log_validation_disabled";
pub const CODE_CONFIG_RECORDER_MISSING: &str = "config_recorder_missing";
pub const CODE_RETENTION_TOO_SHORT: &str = "retention_too_short";

// Codes: data
pub const CODE_STORAGE_UNENCRYPTED: &str = "storage_unencrypted";
pub const CODE_BACKUP_RETENTION_TOO_SHORT: &str = "backup_retention_too_short";
pub const CODE_QUEUE_UNENCRYPTED: &str = "queue_unencrypted";

// Codes: compute
pub const CODE_VOLUME_UNENCRYPTED: &str = "volume_unencrypted";
pub const CODE_MONITORING_DISABLED: &str = "monitoring_disabled";
pub const CODE_SSH_OPEN_TO_WORLD: &str = "ssh_open_to_world";

// Codes: kms
pub const CODE_ROTATION_DISABLED: &str = "rotation_disabled";

/// Package segment of a dotted rule ID (`s3.bucket_encryption` -> `s3`).
pub fn package_of(rule_id: &str) -> &str {
    rule_id.split_once('.').map(|(pkg, _)| pkg).unwrap_or(rule_id)
}
