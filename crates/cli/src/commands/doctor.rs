use renoprop_core::config::{AppConfig, LoadOptions};
use renoprop_pdf::PdfRenderer;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> String {
    let report = build_report();

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_storage_credentials(&config));
            checks.push(check_llm_key(&config));
            checks.push(check_pdf_render());
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(DoctorCheck {
                name: "storage_credentials",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
            checks.push(DoctorCheck {
                name: "llm_key_readiness",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
            checks.push(check_pdf_render());
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_storage_credentials(config: &AppConfig) -> DoctorCheck {
    let details = format!(
        "access token present for bucket `{}` (validated by config contract)",
        config.storage.bucket
    );
    DoctorCheck { name: "storage_credentials", status: CheckStatus::Pass, details }
}

fn check_llm_key(config: &AppConfig) -> DoctorCheck {
    DoctorCheck {
        name: "llm_key_readiness",
        status: CheckStatus::Pass,
        details: format!("api key present for model `{}`", config.llm.model),
    }
}

/// Render a one-line document in-process. Catches layout or assembly
/// regressions before any conversation starts.
fn check_pdf_render() -> DoctorCheck {
    match PdfRenderer::new().render("doctor readiness probe") {
        Ok(bytes) => DoctorCheck {
            name: "pdf_render",
            status: CheckStatus::Pass,
            details: format!("rendered probe document ({} bytes)", bytes.len()),
        },
        Err(error) => DoctorCheck {
            name: "pdf_render",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
