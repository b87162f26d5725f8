use super::Rule;
use super::predicate::{Decision, at, every_element, is_true};
use crate::model::Value;
use planguard_types::ids;

const SSH_PORT: f64 = 22.0;
const WORLD_V4: &str = "0.0.0.0/0";
const WORLD_V6: &str = "::/0";

pub fn rules() -> Vec<Rule> {
    vec![
        Rule::attribute(
            ids::RULE_COMPUTE_EBS_ENCRYPTION,
            ids::CODE_VOLUME_UNENCRYPTED,
            "aws_ebs_volume",
            None,
            |volume, _| at(volume.attr("encrypted"), |v| is_true(v, Decision::Violation)),
            |_, id, _| format!("EBS volume '{id}' is not encrypted"),
        )
        .with_control("CIS AWS 2.2.1")
        .with_help("Set encrypted = true on the volume."),
        Rule::attribute(
            ids::RULE_COMPUTE_INSTANCE_MONITORING,
            ids::CODE_MONITORING_DISABLED,
            "aws_instance",
            None,
            |instance, _| at(instance.attr("monitoring"), |v| is_true(v, Decision::Violation)),
            |_, id, _| format!("EC2 instance '{id}' does not have detailed monitoring enabled"),
        )
        .with_help("Set monitoring = true on the instance."),
        Rule::attribute(
            ids::RULE_COMPUTE_SSH_INGRESS,
            ids::CODE_SSH_OPEN_TO_WORLD,
            "aws_security_group",
            Some("name"),
            |group, _| {
                at(group.attr("ingress"), |rules| {
                    every_element(rules, Decision::Compliant, ingress_is_safe)
                })
            },
            |_, id, _| format!("security group '{id}' allows SSH (port 22) from the internet"),
        )
        .with_control("CIS AWS 5.2")
        .with_help("Restrict port 22 ingress to known CIDR ranges or use Session Manager."),
    ]
}

/// An ingress block is safe when it does not reach port 22 or does not admit the whole internet.
fn ingress_is_safe(rule: &Value) -> Decision {
    excludes_ssh(rule).or(excludes_world(rule))
}

fn excludes_ssh(rule: &Value) -> Decision {
    match rule.get("protocol") {
        Ok(Value::Unknown) => return Decision::Unverifiable,
        Ok(Value::String(p)) if p == "-1" || p.eq_ignore_ascii_case("all") => {
            return Decision::Violation;
        }
        Ok(Value::String(p)) if !(p.eq_ignore_ascii_case("tcp") || p == "6") => {
            return Decision::Compliant;
        }
        _ => {}
    }

    match (rule.get("from_port"), rule.get("to_port")) {
        (Ok(Value::Number(from)), Ok(Value::Number(to))) => {
            Decision::from_bool(!(*from <= SSH_PORT && SSH_PORT <= *to))
        }
        (Ok(Value::Unknown), _) | (_, Ok(Value::Unknown)) => Decision::Unverifiable,
        _ => Decision::NotApplicable,
    }
}

fn excludes_world(rule: &Value) -> Decision {
    let v4 = at(rule.get("cidr_blocks"), |cidrs| {
        every_element(cidrs, Decision::Compliant, |c| not_cidr(c, WORLD_V4))
    });
    let v6 = at(rule.get("ipv6_cidr_blocks"), |cidrs| {
        every_element(cidrs, Decision::Compliant, |c| not_cidr(c, WORLD_V6))
    });
    v4.and(v6)
}

fn not_cidr(cidr: &Value, world: &str) -> Decision {
    match cidr {
        Value::String(s) => Decision::from_bool(s.trim() != world),
        Value::Unknown => Decision::Unverifiable,
        Value::Null => Decision::Compliant,
        Value::Bool(_) | Value::Number(_) | Value::List(_) | Value::Object(_) => {
            Decision::NotApplicable
        }
    }
}
