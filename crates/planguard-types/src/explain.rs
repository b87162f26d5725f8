//! Explain registry for rules and codes.
//!
//! Maps rule IDs and codes to human-readable explanations with remediation guidance.

use crate::ids;

/// Explanation entry for a rule or code.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the rule/code.
    pub title: &'static str,
    /// What the rule checks and why it exists.
    pub description: &'static str,
    /// How to fix violations.
    pub remediation: &'static str,
    /// Before/after Terraform examples.
    pub examples: ExamplePair,
}

/// Before and after Terraform examples.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// Configuration that would trigger a violation.
    pub before: &'static str,
    /// Configuration that passes the rule.
    pub after: &'static str,
}

/// Look up an explanation by rule_id or code.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    match identifier {
        // Rule IDs
        ids::RULE_S3_BUCKET_ENCRYPTION => Some(explain_bucket_encryption()),
        ids::RULE_S3_BUCKET_VERSIONING => Some(explain_bucket_versioning()),
        ids::RULE_S3_BUCKET_LOGGING => Some(explain_bucket_logging()),
        ids::RULE_S3_PUBLIC_ACCESS_BLOCK => Some(explain_public_access_block()),
        ids::RULE_AUDIT_CLOUDTRAIL_PRESENT => Some(explain_cloudtrail_present()),
        ids::RULE_AUDIT_CLOUDTRAIL_MULTI_REGION => Some(explain_cloudtrail_multi_region()),
        ids::RULE_AUDIT_CLOUDTRAIL_LOG_VALIDATION => Some(explain_cloudtrail_log_validation()),
        ids::RULE_AUDIT_CONFIG_RECORDER_PRESENT => Some(explain_config_recorder_present()),
        ids::RULE_AUDIT_LOG_GROUP_RETENTION => Some(explain_log_group_retention()),
        ids::RULE_DATA_RDS_ENCRYPTION => Some(explain_rds_encryption()),
        ids::RULE_DATA_RDS_BACKUP_RETENTION => Some(explain_rds_backup_retention()),
        ids::RULE_DATA_SQS_ENCRYPTION => Some(explain_sqs_encryption()),
        ids::RULE_COMPUTE_EBS_ENCRYPTION => Some(explain_ebs_encryption()),
        ids::RULE_COMPUTE_INSTANCE_MONITORING => Some(explain_instance_monitoring()),
        ids::RULE_COMPUTE_SSH_INGRESS => Some(explain_ssh_ingress()),
        ids::RULE_KMS_KEY_ROTATION => Some(explain_key_rotation()),

        // Codes
        ids::CODE_BUCKET_UNENCRYPTED => Some(retitle(explain_bucket_encryption(), "Unencrypted Bucket")),
        ids::CODE_VERSIONING_DISABLED => Some(retitle(explain_bucket_versioning(), "Versioning Disabled")),
        ids::CODE_ACCESS_LOGGING_DISABLED => {
            Some(retitle(explain_bucket_logging(), "Access Logging Disabled"))
        }
        ids::CODE_PUBLIC_ACCESS_NOT_BLOCKED => {
            Some(retitle(explain_public_access_block(), "Public Access Not Blocked"))
        }
        ids::CODE_TRAIL_MISSING => Some(retitle(explain_cloudtrail_present(), "CloudTrail Missing")),
        ids::CODE_TRAIL_SINGLE_REGION => {
            Some(retitle(explain_cloudtrail_multi_region(), "Single-Region Trail"))
        }
        ids::CODE_LOG_VALIDATION_DISABLED => {
            Some(retitle(explain_cloudtrail_log_validation(), "Log Validation Disabled"))
        }
        ids::CODE_CONFIG_RECORDER_MISSING => {
            Some(retitle(explain_config_recorder_present(), "Config Recorder Missing"))
        }
        ids::CODE_RETENTION_TOO_SHORT => {
            Some(retitle(explain_log_group_retention(), "Log Retention Too Short"))
        }
        ids::CODE_STORAGE_UNENCRYPTED => Some(retitle(explain_rds_encryption(), "Unencrypted Storage")),
        ids::CODE_BACKUP_RETENTION_TOO_SHORT => {
            Some(retitle(explain_rds_backup_retention(), "Backup Retention Too Short"))
        }
        ids::CODE_QUEUE_UNENCRYPTED => Some(retitle(explain_sqs_encryption(), "Unencrypted Queue")),
        ids::CODE_VOLUME_UNENCRYPTED => Some(retitle(explain_ebs_encryption(), "Unencrypted Volume")),
        ids::CODE_MONITORING_DISABLED => {
            Some(retitle(explain_instance_monitoring(), "Detailed Monitoring Disabled"))
        }
        ids::CODE_SSH_OPEN_TO_WORLD => Some(retitle(explain_ssh_ingress(), "SSH Open To The World")),
        ids::CODE_ROTATION_DISABLED => Some(retitle(explain_key_rotation(), "Key Rotation Disabled")),

        _ => None,
    }
}

fn retitle(mut exp: Explanation, title: &'static str) -> Explanation {
    exp.title = title;
    exp
}

// --- s3 ---

fn explain_bucket_encryption() -> Explanation {
    Explanation {
        title: "S3 Bucket Default Encryption",
        description: "\
Every aws_s3_bucket must have default server-side encryption configured (CIS AWS 2.1.1).

The AWS provider accepts two spellings of the same configuration:
- the legacy inline `server_side_encryption_configuration` block on the bucket
- a separate aws_s3_bucket_server_side_encryption_configuration resource

Either satisfies the rule. The companion resource is matched to its bucket by the
`bucket` attribute, by a reference expression such as `aws_s3_bucket.logs.id`, or,
when the plan carries no linkage value at all, by being the only candidate.",
        remediation: "\
Add an aws_s3_bucket_server_side_encryption_configuration resource that references the
bucket and sets `sse_algorithm` to `AES256` or `aws:kms`.",
        examples: ExamplePair {
            before: r#"resource "aws_s3_bucket" "logs" {
  bucket = "acme-logs"
}"#,
            after: r#"resource "aws_s3_bucket" "logs" {
  bucket = "acme-logs"
}

resource "aws_s3_bucket_server_side_encryption_configuration" "logs" {
  bucket = aws_s3_bucket.logs.id
  rule {
    apply_server_side_encryption_by_default {
      sse_algorithm = "aws:kms"
    }
  }
}"#,
        },
    }
}

fn explain_bucket_versioning() -> Explanation {
    Explanation {
        title: "S3 Bucket Versioning",
        description: "\
Every aws_s3_bucket must have versioning enabled so overwritten and deleted objects
can be recovered (CIS AWS 2.1.3).

Satisfied by the legacy inline `versioning { enabled = true }` block or by an
aws_s3_bucket_versioning resource with `status = \"Enabled\"`.",
        remediation: "\
Add an aws_s3_bucket_versioning resource for the bucket with
`versioning_configuration { status = \"Enabled\" }`.",
        examples: ExamplePair {
            before: r#"resource "aws_s3_bucket_versioning" "logs" {
  bucket = aws_s3_bucket.logs.id
  versioning_configuration {
    status = "Suspended"
  }
}"#,
            after: r#"resource "aws_s3_bucket_versioning" "logs" {
  bucket = aws_s3_bucket.logs.id
  versioning_configuration {
    status = "Enabled"
  }
}"#,
        },
    }
}

fn explain_bucket_logging() -> Explanation {
    Explanation {
        title: "S3 Bucket Access Logging",
        description: "\
Every aws_s3_bucket must deliver server access logs to a target bucket (CIS AWS 3.6).

Satisfied by the legacy inline `logging` block or by an aws_s3_bucket_logging
resource with a `target_bucket`.",
        remediation: "\
Add an aws_s3_bucket_logging resource for the bucket pointing at a dedicated log bucket.",
        examples: ExamplePair {
            before: r#"resource "aws_s3_bucket" "data" {
  bucket = "acme-data"
}"#,
            after: r#"resource "aws_s3_bucket_logging" "data" {
  bucket        = aws_s3_bucket.data.id
  target_bucket = aws_s3_bucket.logs.id
  target_prefix = "s3/acme-data/"
}"#,
        },
    }
}

fn explain_public_access_block() -> Explanation {
    Explanation {
        title: "S3 Public Access Block",
        description: "\
Every aws_s3_bucket must have an aws_s3_bucket_public_access_block with all four
settings enabled (CIS AWS 2.1.5): block_public_acls, block_public_policy,
ignore_public_acls and restrict_public_buckets.

There is no inline form of this setting; only the companion resource satisfies it.",
        remediation: "\
Add an aws_s3_bucket_public_access_block for the bucket with all four flags set to true.",
        examples: ExamplePair {
            before: r#"resource "aws_s3_bucket_public_access_block" "data" {
  bucket              = aws_s3_bucket.data.id
  block_public_acls   = true
  block_public_policy = false
}"#,
            after: r#"resource "aws_s3_bucket_public_access_block" "data" {
  bucket                  = aws_s3_bucket.data.id
  block_public_acls       = true
  block_public_policy     = true
  ignore_public_acls      = true
  restrict_public_buckets = true
}"#,
        },
    }
}

// --- audit ---

fn explain_cloudtrail_present() -> Explanation {
    Explanation {
        title: "CloudTrail Present",
        description: "\
The plan must declare at least one aws_cloudtrail so API activity is recorded
account-wide (CIS AWS 3.1). This is a plan-wide rule: it reports once, without a
resource, when no trail exists anywhere in the plan.",
        remediation: "\
Declare an aws_cloudtrail resource, or evaluate the plan of the stack that owns the
account trail.",
        examples: ExamplePair {
            before: "# no aws_cloudtrail in the configuration",
            after: r#"resource "aws_cloudtrail" "main" {
  name                          = "org-trail"
  s3_bucket_name                = aws_s3_bucket.trail.id
  is_multi_region_trail         = true
  enable_log_file_validation    = true
}"#,
        },
    }
}

fn explain_cloudtrail_multi_region() -> Explanation {
    Explanation {
        title: "CloudTrail Multi-Region",
        description: "\
Every aws_cloudtrail must capture events from all regions (CIS AWS 3.1).",
        remediation: "Set `is_multi_region_trail = true` on the trail.",
        examples: ExamplePair {
            before: r#"resource "aws_cloudtrail" "main" {
  name           = "org-trail"
  s3_bucket_name = aws_s3_bucket.trail.id
}"#,
            after: r#"resource "aws_cloudtrail" "main" {
  name                  = "org-trail"
  s3_bucket_name        = aws_s3_bucket.trail.id
  is_multi_region_trail = true
}"#,
        },
    }
}

fn explain_cloudtrail_log_validation() -> Explanation {
    Explanation {
        title: "CloudTrail Log File Validation",
        description: "\
Every aws_cloudtrail must enable log file integrity validation so tampering with
delivered logs is detectable (CIS AWS 3.2).",
        remediation: "Set `enable_log_file_validation = true` on the trail.",
        examples: ExamplePair {
            before: r#"resource "aws_cloudtrail" "main" {
  name                       = "org-trail"
  enable_log_file_validation = false
}"#,
            after: r#"resource "aws_cloudtrail" "main" {
  name                       = "org-trail"
  enable_log_file_validation = true
}"#,
        },
    }
}

fn explain_config_recorder_present() -> Explanation {
    Explanation {
        title: "AWS Config Recorder Present",
        description: "\
The plan must declare an aws_config_configuration_recorder so resource configuration
history is captured (CIS AWS 3.5). Reported once for the whole plan.",
        remediation: "Declare an aws_config_configuration_recorder with a delivery channel.",
        examples: ExamplePair {
            before: "# no aws_config_configuration_recorder in the configuration",
            after: r#"resource "aws_config_configuration_recorder" "main" {
  name     = "default"
  role_arn = aws_iam_role.config.arn
  recording_group {
    all_supported = true
  }
}"#,
        },
    }
}

fn explain_log_group_retention() -> Explanation {
    Explanation {
        title: "CloudWatch Log Group Retention",
        description: "\
Every aws_cloudwatch_log_group must keep events for at least the configured number of
days (default 365). A retention of 0, or no retention at all, means events never
expire and is compliant.",
        remediation: "\
Raise `retention_in_days`, or adjust the threshold for this rule in planguard.toml.",
        examples: ExamplePair {
            before: r#"resource "aws_cloudwatch_log_group" "app" {
  name              = "/app/api"
  retention_in_days = 14
}"#,
            after: r#"resource "aws_cloudwatch_log_group" "app" {
  name              = "/app/api"
  retention_in_days = 365
}"#,
        },
    }
}

// --- data ---

fn explain_rds_encryption() -> Explanation {
    Explanation {
        title: "RDS Storage Encryption",
        description: "\
Every aws_db_instance must encrypt its storage at rest (CIS AWS 2.3.1). Encryption
cannot be enabled on an existing instance without a snapshot restore.",
        remediation: "Set `storage_encrypted = true`, optionally with a `kms_key_id`.",
        examples: ExamplePair {
            before: r#"resource "aws_db_instance" "orders" {
  identifier     = "orders"
  engine         = "postgres"
  instance_class = "db.t3.medium"
}"#,
            after: r#"resource "aws_db_instance" "orders" {
  identifier        = "orders"
  engine            = "postgres"
  instance_class    = "db.t3.medium"
  storage_encrypted = true
}"#,
        },
    }
}

fn explain_rds_backup_retention() -> Explanation {
    Explanation {
        title: "RDS Backup Retention",
        description: "\
Every aws_db_instance must retain automated backups for at least the configured number
of days (default 7, inclusive). A value of 0 disables automated backups entirely.",
        remediation: "\
Raise `backup_retention_period`, or adjust the threshold for this rule in planguard.toml.",
        examples: ExamplePair {
            before: r#"resource "aws_db_instance" "orders" {
  identifier              = "orders"
  backup_retention_period = 1
}"#,
            after: r#"resource "aws_db_instance" "orders" {
  identifier              = "orders"
  backup_retention_period = 7
}"#,
        },
    }
}

fn explain_sqs_encryption() -> Explanation {
    Explanation {
        title: "SQS Queue Encryption",
        description: "\
Every aws_sqs_queue must encrypt messages at rest, either with SQS-managed keys
(`sqs_managed_sse_enabled = true`) or with a KMS key (`kms_master_key_id`).",
        remediation: "Set `sqs_managed_sse_enabled = true` or provide `kms_master_key_id`.",
        examples: ExamplePair {
            before: r#"resource "aws_sqs_queue" "jobs" {
  name                    = "jobs"
  sqs_managed_sse_enabled = false
}"#,
            after: r#"resource "aws_sqs_queue" "jobs" {
  name              = "jobs"
  kms_master_key_id = aws_kms_key.queues.arn
}"#,
        },
    }
}

// --- compute ---

fn explain_ebs_encryption() -> Explanation {
    Explanation {
        title: "EBS Volume Encryption",
        description: "Every aws_ebs_volume must be encrypted at rest (CIS AWS 2.2.1).",
        remediation: "Set `encrypted = true` on the volume.",
        examples: ExamplePair {
            before: r#"resource "aws_ebs_volume" "data" {
  availability_zone = "eu-west-1a"
  size              = 100
}"#,
            after: r#"resource "aws_ebs_volume" "data" {
  availability_zone = "eu-west-1a"
  size              = 100
  encrypted         = true
}"#,
        },
    }
}

fn explain_instance_monitoring() -> Explanation {
    Explanation {
        title: "EC2 Detailed Monitoring",
        description: "Every aws_instance must enable detailed (one-minute) CloudWatch monitoring.",
        remediation: "Set `monitoring = true` on the instance.",
        examples: ExamplePair {
            before: r#"resource "aws_instance" "web" {
  ami           = data.aws_ami.base.id
  instance_type = "t3.small"
}"#,
            after: r#"resource "aws_instance" "web" {
  ami           = data.aws_ami.base.id
  instance_type = "t3.small"
  monitoring    = true
}"#,
        },
    }
}

fn explain_ssh_ingress() -> Explanation {
    Explanation {
        title: "No SSH Ingress From The Internet",
        description: "\
No aws_security_group may contain an ingress block that opens port 22 to 0.0.0.0/0 or
::/0 (CIS AWS 5.2). A block matches when its port range covers 22 or its protocol is
`-1` (all traffic).",
        remediation: "\
Restrict the ingress CIDR to a bastion or VPN range, or use SSM Session Manager instead
of SSH.",
        examples: ExamplePair {
            before: r#"ingress {
  from_port   = 22
  to_port     = 22
  protocol    = "tcp"
  cidr_blocks = ["0.0.0.0/0"]
}"#,
            after: r#"ingress {
  from_port   = 22
  to_port     = 22
  protocol    = "tcp"
  cidr_blocks = ["10.20.0.0/16"]
}"#,
        },
    }
}

// --- kms ---

fn explain_key_rotation() -> Explanation {
    Explanation {
        title: "KMS Key Rotation",
        description: "\
Every symmetric aws_kms_key must enable automatic key rotation (CIS AWS 3.8).
Asymmetric and HMAC keys cannot be rotated and are not checked.",
        remediation: "Set `enable_key_rotation = true` on the key.",
        examples: ExamplePair {
            before: r#"resource "aws_kms_key" "data" {
  description = "data key"
}"#,
            after: r#"resource "aws_kms_key" "data" {
  description         = "data key"
  enable_key_rotation = true
}"#,
        },
    }
}
