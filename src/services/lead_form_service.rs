use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::models::lead::{BudgetRange, LeadFields, LeadFieldsPatch, ProjectTimeline};
use crate::models::quote::EstimateId;
use crate::models::selection::{EstimateResult, Selection};
use crate::models::service::{Service, TimelineOption};
use crate::models::submission::{SubmissionOutcome, SubmissionPayload, Transport};
use crate::services::challenge_service::Challenge;
use crate::services::pricing_service::PricingService;

pub type FieldErrors = BTreeMap<String, String>;

const WIZARD_FORM_TYPE: &str = "project_wizard";
const SIMPLE_FORM_TYPE: &str = "simple_contact";

#[derive(Debug, Error, PartialEq)]
pub enum LeadFormError {
    #[error("Please correct the highlighted fields")]
    Validation(FieldErrors),
    #[error("Already on the first step")]
    AtFirstStep,
    #[error("This is the last step, submit the form instead")]
    AtFinalStep,
    #[error("The form can only be submitted from the contact step or the simple form")]
    NotSubmittable,
    #[error("This action is not available on the simple form")]
    NotInWizard,
    #[error("A submission is already in progress")]
    SubmissionInProgress,
    #[error("Acknowledge the previous submission first")]
    AwaitingAcknowledgement,
    #[error("There is no submission to acknowledge")]
    NothingToAcknowledge,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    ProjectType,
    BudgetTimeline,
    TechRequirements,
    BusinessDetails,
    ContactInfo,
}

impl WizardStep {
    pub const COUNT: usize = 5;

    pub fn index(&self) -> usize {
        match self {
            WizardStep::ProjectType => 0,
            WizardStep::BudgetTimeline => 1,
            WizardStep::TechRequirements => 2,
            WizardStep::BusinessDetails => 3,
            WizardStep::ContactInfo => 4,
        }
    }

    pub fn next(&self) -> Option<WizardStep> {
        match self {
            WizardStep::ProjectType => Some(WizardStep::BudgetTimeline),
            WizardStep::BudgetTimeline => Some(WizardStep::TechRequirements),
            WizardStep::TechRequirements => Some(WizardStep::BusinessDetails),
            WizardStep::BusinessDetails => Some(WizardStep::ContactInfo),
            WizardStep::ContactInfo => None,
        }
    }

    pub fn previous(&self) -> Option<WizardStep> {
        match self {
            WizardStep::ProjectType => None,
            WizardStep::BudgetTimeline => Some(WizardStep::ProjectType),
            WizardStep::TechRequirements => Some(WizardStep::BudgetTimeline),
            WizardStep::BusinessDetails => Some(WizardStep::TechRequirements),
            WizardStep::ContactInfo => Some(WizardStep::BusinessDetails),
        }
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FormMode {
    Wizard,
    Simple,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FormPhase {
    Editing,
    Submitting,
    Succeeded {
        transport: Transport,
        #[serde(skip_serializing_if = "Option::is_none")]
        mailto_url: Option<String>,
    },
    Failed {
        message: String,
    },
}

/// What the client gets to see. The challenge answer is never included.
#[derive(Debug, Serialize, Clone)]
pub struct LeadFormView {
    pub mode: FormMode,
    pub step: WizardStep,
    pub step_index: usize,
    pub total_steps: usize,
    pub phase: FormPhase,
    pub fields: LeadFields,
    pub errors: FieldErrors,
    pub challenge_question: String,
}

pub fn is_valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok())
        .as_ref()
        .map(|re| re.is_match(email.trim()))
        .unwrap_or(false)
}

/// Multi-step lead capture: five wizard steps plus a simplified contact form.
#[derive(Debug, Clone)]
pub struct LeadForm {
    mode: FormMode,
    step: WizardStep,
    phase: FormPhase,
    fields: LeadFields,
    errors: FieldErrors,
    challenge: Challenge,
}

impl Default for LeadForm {
    fn default() -> Self {
        Self::new()
    }
}

impl LeadForm {
    pub fn new() -> Self {
        Self::with_challenge(Challenge::random())
    }

    pub fn with_challenge(challenge: Challenge) -> Self {
        Self {
            mode: FormMode::Wizard,
            step: WizardStep::ProjectType,
            phase: FormPhase::Editing,
            fields: LeadFields::default(),
            errors: FieldErrors::new(),
            challenge,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    pub fn fields(&self) -> &LeadFields {
        &self.fields
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn view(&self) -> LeadFormView {
        LeadFormView {
            mode: self.mode,
            step: self.step,
            step_index: self.step.index(),
            total_steps: WizardStep::COUNT,
            phase: self.phase.clone(),
            fields: self.fields.clone(),
            errors: self.errors.clone(),
            challenge_question: self.challenge.question(),
        }
    }

    pub fn update(&mut self, patch: LeadFieldsPatch) -> Result<(), LeadFormError> {
        self.ensure_editable()?;
        self.fields.apply(patch);
        Ok(())
    }

    /// Fills empty wizard fields from an estimate. Anything the visitor already
    /// entered is kept.
    pub fn prefill(
        &mut self,
        selection: &Selection,
        estimate: &EstimateResult,
        estimate_id: Option<&EstimateId>,
        catalog: &[Service],
    ) -> Result<(), LeadFormError> {
        self.ensure_editable()?;

        let selected: Vec<&Service> = catalog
            .iter()
            .filter(|service| selection.service_ids.contains(&service.id))
            .collect();

        if self.fields.project_type.is_none() {
            self.fields.project_type = selected.iter().find_map(|service| service.project_type);
        }
        if self.fields.timeline.is_none() {
            self.fields.timeline = Some(match selection.timeline {
                TimelineOption::OneToThreeMonths => ProjectTimeline::OneToThreeMonths,
                TimelineOption::ThreeToSixMonths => ProjectTimeline::ThreeToSixMonths,
                TimelineOption::SixToTwelveMonths | TimelineOption::OverTwelveMonths => {
                    ProjectTimeline::SixPlusMonths
                }
            });
        }
        if self.fields.budget.is_none() && estimate.has_estimate {
            self.fields.budget = Some(BudgetRange::for_amount(estimate.total));
        }
        if self.fields.description.trim().is_empty() && estimate.has_estimate {
            let names: Vec<&str> = selected.iter().map(|service| service.name.as_str()).collect();
            let reference = estimate_id
                .map(|id| format!("Estimate {}: ", id))
                .unwrap_or_default();
            self.fields.description = format!(
                "{}{} ({} complexity, {} months, {} support). Estimated total {}.",
                reference,
                names.join(", "),
                selection.complexity.key(),
                selection.timeline.key(),
                selection.support.key(),
                PricingService::format_currency(estimate.total)
            );
        }

        Ok(())
    }

    pub fn advance(&mut self) -> Result<WizardStep, LeadFormError> {
        self.ensure_editable()?;
        if self.mode != FormMode::Wizard {
            return Err(LeadFormError::NotInWizard);
        }
        let next = self.step.next().ok_or(LeadFormError::AtFinalStep)?;

        let errors = validate_step(self.step, &self.fields, &self.challenge);
        if !errors.is_empty() {
            self.errors = errors.clone();
            return Err(LeadFormError::Validation(errors));
        }

        self.errors.clear();
        self.step = next;
        Ok(next)
    }

    pub fn retreat(&mut self) -> Result<WizardStep, LeadFormError> {
        self.ensure_editable()?;
        if self.mode != FormMode::Wizard {
            return Err(LeadFormError::NotInWizard);
        }
        let previous = self.step.previous().ok_or(LeadFormError::AtFirstStep)?;

        self.errors.clear();
        self.step = previous;
        Ok(previous)
    }

    pub fn switch_to_simple(&mut self) -> Result<(), LeadFormError> {
        self.ensure_editable()?;
        self.mode = FormMode::Simple;
        self.errors.clear();
        Ok(())
    }

    pub fn switch_to_wizard(&mut self) -> Result<(), LeadFormError> {
        self.ensure_editable()?;
        self.mode = FormMode::Wizard;
        self.step = WizardStep::ProjectType;
        self.errors.clear();
        Ok(())
    }

    /// Validates the submitting step and moves to `Submitting`, returning the
    /// payload for the transport chain.
    pub fn begin_submission(&mut self) -> Result<SubmissionPayload, LeadFormError> {
        self.ensure_editable()?;
        if self.mode == FormMode::Wizard && self.step != WizardStep::ContactInfo {
            return Err(LeadFormError::NotSubmittable);
        }

        let errors = match self.mode {
            FormMode::Wizard => validate_step(self.step, &self.fields, &self.challenge),
            FormMode::Simple => validate_simple(&self.fields, &self.challenge),
        };
        if !errors.is_empty() {
            self.errors = errors.clone();
            return Err(LeadFormError::Validation(errors));
        }

        self.errors.clear();
        self.phase = FormPhase::Submitting;
        Ok(self.payload())
    }

    /// Records the chain's outcome. Either way the challenge is spent and replaced.
    pub fn complete_submission(&mut self, outcome: &SubmissionOutcome) {
        self.challenge = Challenge::random();
        self.fields.challenge_answer.clear();

        self.phase = match outcome {
            SubmissionOutcome::Success {
                transport,
                mailto_url,
            } => FormPhase::Succeeded {
                transport: *transport,
                mailto_url: mailto_url.clone(),
            },
            SubmissionOutcome::Failed { message } => FormPhase::Failed {
                message: message.clone(),
            },
        };
    }

    /// After success the form starts over empty; after failure the visitor is
    /// returned to where they were with their input intact.
    pub fn acknowledge(&mut self) -> Result<(), LeadFormError> {
        match self.phase {
            FormPhase::Succeeded { .. } => {
                *self = Self::with_challenge(self.challenge.clone());
                Ok(())
            }
            FormPhase::Failed { .. } => {
                self.phase = FormPhase::Editing;
                Ok(())
            }
            FormPhase::Submitting => Err(LeadFormError::SubmissionInProgress),
            FormPhase::Editing => Err(LeadFormError::NothingToAcknowledge),
        }
    }

    fn ensure_editable(&mut self) -> Result<(), LeadFormError> {
        match self.phase {
            FormPhase::Editing => Ok(()),
            FormPhase::Submitting => Err(LeadFormError::SubmissionInProgress),
            FormPhase::Succeeded { .. } => Err(LeadFormError::AwaitingAcknowledgement),
            // Editing again after a failed attempt implicitly dismisses the failure.
            FormPhase::Failed { .. } => {
                self.phase = FormPhase::Editing;
                Ok(())
            }
        }
    }

    fn payload(&self) -> SubmissionPayload {
        let fields = &self.fields;
        let (subject, message, form_type) = match self.mode {
            FormMode::Wizard => {
                let project = fields
                    .project_type
                    .map(|project_type| project_type.label())
                    .unwrap_or("Project");
                (
                    format!("New project inquiry: {}", project),
                    wizard_summary(fields),
                    WIZARD_FORM_TYPE,
                )
            }
            FormMode::Simple => {
                let subject = if fields.subject.trim().is_empty() {
                    "Website contact form".to_string()
                } else {
                    fields.subject.trim().to_string()
                };
                (subject, fields.message.trim().to_string(), SIMPLE_FORM_TYPE)
            }
        };

        SubmissionPayload {
            name: fields.name.trim().to_string(),
            email: fields.email.trim().to_string(),
            subject,
            message,
            honeypot: fields.honeypot.clone(),
            captcha: fields.challenge_answer.trim().to_string(),
            form_type: Some(form_type.to_string()),
        }
    }
}

pub fn validate_step(step: WizardStep, fields: &LeadFields, challenge: &Challenge) -> FieldErrors {
    let mut errors = FieldErrors::new();

    match step {
        WizardStep::ProjectType => {
            if fields.project_type.is_none() {
                errors.insert(
                    "project_type".to_string(),
                    "Please select a project type".to_string(),
                );
            }
        }
        WizardStep::BudgetTimeline => {
            if fields.budget.is_none() {
                errors.insert("budget".to_string(), "Please select a budget range".to_string());
            }
            if fields.timeline.is_none() {
                errors.insert("timeline".to_string(), "Please select a timeline".to_string());
            }
        }
        WizardStep::TechRequirements => {
            if fields.platforms.is_empty() {
                errors.insert(
                    "platforms".to_string(),
                    "Please select at least one platform".to_string(),
                );
            }
        }
        WizardStep::BusinessDetails => {
            if fields.business_type.is_none() {
                errors.insert(
                    "business_type".to_string(),
                    "Please select your business type".to_string(),
                );
            }
        }
        WizardStep::ContactInfo => {
            validate_contact(fields, &mut errors);
            validate_challenge(fields, challenge, &mut errors);
        }
    }

    errors
}

pub fn validate_simple(fields: &LeadFields, challenge: &Challenge) -> FieldErrors {
    let mut errors = FieldErrors::new();
    validate_contact(fields, &mut errors);
    if fields.message.trim().is_empty() {
        errors.insert("message".to_string(), "Please enter a message".to_string());
    }
    validate_challenge(fields, challenge, &mut errors);
    errors
}

fn validate_contact(fields: &LeadFields, errors: &mut FieldErrors) {
    if fields.name.trim().is_empty() {
        errors.insert("name".to_string(), "Please enter your name".to_string());
    }
    if fields.email.trim().is_empty() {
        errors.insert("email".to_string(), "Please enter your email".to_string());
    } else if !is_valid_email(&fields.email) {
        errors.insert(
            "email".to_string(),
            "Please enter a valid email address".to_string(),
        );
    }
}

fn validate_challenge(fields: &LeadFields, challenge: &Challenge, errors: &mut FieldErrors) {
    if !challenge.verify(&fields.challenge_answer) {
        errors.insert(
            "captcha".to_string(),
            "Incorrect answer to the security question, please try again".to_string(),
        );
    }
}

fn wizard_summary(fields: &LeadFields) -> String {
    fn line(lines: &mut Vec<String>, label: &str, value: &str) {
        if !value.trim().is_empty() {
            lines.push(format!("{}: {}", label, value.trim()));
        }
    }

    fn join<T>(values: impl IntoIterator<Item = T>, render: impl Fn(T) -> String) -> String {
        values.into_iter().map(render).collect::<Vec<_>>().join(", ")
    }

    let mut lines = Vec::new();
    line(
        &mut lines,
        "Project type",
        fields.project_type.map(|v| v.label()).unwrap_or_default(),
    );
    line(&mut lines, "Description", &fields.description);
    line(
        &mut lines,
        "Budget",
        fields.budget.map(|v| v.label()).unwrap_or_default(),
    );
    line(
        &mut lines,
        "Timeline",
        fields.timeline.map(|v| v.label()).unwrap_or_default(),
    );
    line(
        &mut lines,
        "Priority",
        fields.priority.map(|v| v.label()).unwrap_or_default(),
    );
    line(
        &mut lines,
        "Platforms",
        &join(fields.platforms.iter(), |p| p.label().to_string()),
    );
    line(&mut lines, "Features", &join(fields.features.iter(), |f| f.clone()));
    line(
        &mut lines,
        "Integrations",
        &join(fields.integrations.iter(), |i| i.clone()),
    );
    line(
        &mut lines,
        "Business type",
        fields.business_type.map(|v| v.label()).unwrap_or_default(),
    );
    line(
        &mut lines,
        "Team size",
        fields.team_size.map(|v| v.label()).unwrap_or_default(),
    );
    line(&mut lines, "Current solution", &fields.current_solution);
    line(&mut lines, "Company", &fields.company);
    line(&mut lines, "Phone", &fields.phone);
    line(&mut lines, "Additional notes", &fields.message);

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::catalog::Catalog;
    use crate::models::lead::{BusinessType, Platform, ProjectType};
    use crate::services::challenge_service::Operator;

    fn form() -> LeadForm {
        // 3 + 4 = 7
        LeadForm::with_challenge(Challenge::new(3, 4, Operator::Add))
    }

    fn patch() -> LeadFieldsPatch {
        LeadFieldsPatch::default()
    }

    fn walk_to_contact_step(form: &mut LeadForm) {
        form.update(LeadFieldsPatch {
            project_type: Some(Some(ProjectType::WebApplication)),
            budget: Some(Some(BudgetRange::From10kTo25k)),
            timeline: Some(Some(ProjectTimeline::ThreeToSixMonths)),
            platforms: Some([Platform::Web].into_iter().collect()),
            business_type: Some(Some(BusinessType::Startup)),
            ..patch()
        })
        .unwrap();
        for _ in 0..4 {
            form.advance().unwrap();
        }
        assert_eq!(form.step(), WizardStep::ContactInfo);
    }

    #[test]
    fn test_advance_without_project_type_stays_on_first_step() {
        let mut form = form();
        let result = form.advance();
        assert!(matches!(result, Err(LeadFormError::Validation(ref e)) if e.contains_key("project_type")));
        assert_eq!(form.step(), WizardStep::ProjectType);
        assert!(form.errors().contains_key("project_type"));
    }

    #[test]
    fn test_failed_validation_keeps_input() {
        let mut form = form();
        form.update(LeadFieldsPatch {
            project_type: Some(Some(ProjectType::MobileApp)),
            description: Some("Loyalty app".to_string()),
            ..patch()
        })
        .unwrap();
        form.advance().unwrap();

        form.update(LeadFieldsPatch {
            budget: Some(Some(BudgetRange::Under10k)),
            ..patch()
        })
        .unwrap();
        let result = form.advance();
        assert!(matches!(result, Err(LeadFormError::Validation(ref e)) if e.contains_key("timeline") && !e.contains_key("budget")));
        assert_eq!(form.step(), WizardStep::BudgetTimeline);
        assert_eq!(form.fields().budget, Some(BudgetRange::Under10k));
        assert_eq!(form.fields().description, "Loyalty app");
    }

    #[test]
    fn test_platforms_required_on_tech_step() {
        let mut form = form();
        form.update(LeadFieldsPatch {
            project_type: Some(Some(ProjectType::WebApplication)),
            budget: Some(Some(BudgetRange::Under10k)),
            timeline: Some(Some(ProjectTimeline::Flexible)),
            ..patch()
        })
        .unwrap();
        form.advance().unwrap();
        form.advance().unwrap();
        assert!(form.advance().is_err());
        assert_eq!(form.step(), WizardStep::TechRequirements);
    }

    #[test]
    fn test_retreat_never_validates_and_stops_at_first_step() {
        let mut form = form();
        assert_eq!(form.retreat(), Err(LeadFormError::AtFirstStep));

        walk_to_contact_step(&mut form);
        form.update(LeadFieldsPatch {
            platforms: Some(Default::default()),
            ..patch()
        })
        .unwrap();
        assert_eq!(form.retreat().unwrap(), WizardStep::BusinessDetails);
        assert_eq!(form.retreat().unwrap(), WizardStep::TechRequirements);
        assert_eq!(form.retreat().unwrap(), WizardStep::BudgetTimeline);
    }

    #[test]
    fn test_advance_past_last_step_rejected() {
        let mut form = form();
        walk_to_contact_step(&mut form);
        assert_eq!(form.advance(), Err(LeadFormError::AtFinalStep));
    }

    #[test]
    fn test_submit_only_from_contact_step() {
        let mut form = form();
        assert_eq!(
            form.begin_submission(),
            Err(LeadFormError::NotSubmittable)
        );
    }

    #[test]
    fn test_wrong_challenge_answer_stays_on_contact_step() {
        let mut form = form();
        walk_to_contact_step(&mut form);
        form.update(LeadFieldsPatch {
            name: Some("Ada Lovelace".to_string()),
            email: Some("ada@example.com".to_string()),
            challenge_answer: Some("8".to_string()),
            ..patch()
        })
        .unwrap();

        let result = form.begin_submission();
        match result {
            Err(LeadFormError::Validation(errors)) => {
                assert_eq!(errors.len(), 1);
                assert!(errors.contains_key("captcha"));
            }
            other => panic!("expected captcha error, got {:?}", other),
        }
        assert_eq!(form.step(), WizardStep::ContactInfo);
        assert_eq!(form.phase(), &FormPhase::Editing);
    }

    #[test]
    fn test_invalid_email_rejected() {
        let mut form = form();
        walk_to_contact_step(&mut form);
        form.update(LeadFieldsPatch {
            name: Some("Ada".to_string()),
            email: Some("ada@example".to_string()),
            challenge_answer: Some("7".to_string()),
            ..patch()
        })
        .unwrap();
        let result = form.begin_submission();
        assert!(matches!(result, Err(LeadFormError::Validation(ref e)) if e.contains_key("email")));
    }

    #[test]
    fn test_successful_wizard_submission_lifecycle() {
        let mut form = form();
        walk_to_contact_step(&mut form);
        form.update(LeadFieldsPatch {
            name: Some(" Ada Lovelace ".to_string()),
            email: Some("ada@example.com".to_string()),
            company: Some("Analytical Engines".to_string()),
            honeypot: Some("bot-filled".to_string()),
            challenge_answer: Some(" 7 ".to_string()),
            ..patch()
        })
        .unwrap();

        let payload = form.begin_submission().unwrap();
        assert_eq!(payload.name, "Ada Lovelace");
        assert_eq!(payload.captcha, "7");
        assert_eq!(payload.honeypot, "bot-filled");
        assert_eq!(payload.form_type.as_deref(), Some("project_wizard"));
        assert_eq!(payload.subject, "New project inquiry: Web Application");
        assert!(payload.message.contains("Platforms: Web"));
        assert!(payload.message.contains("Company: Analytical Engines"));
        assert_eq!(form.phase(), &FormPhase::Submitting);
        assert_eq!(form.begin_submission(), Err(LeadFormError::SubmissionInProgress));

        form.complete_submission(&SubmissionOutcome::Success {
            transport: Transport::Api,
            mailto_url: None,
        });
        assert!(matches!(form.phase(), FormPhase::Succeeded { .. }));
        assert!(form.fields().challenge_answer.is_empty());
        assert_eq!(form.advance(), Err(LeadFormError::AwaitingAcknowledgement));

        form.acknowledge().unwrap();
        assert_eq!(form.phase(), &FormPhase::Editing);
        assert_eq!(form.step(), WizardStep::ProjectType);
        assert_eq!(form.fields(), &LeadFields::default());
    }

    #[test]
    fn test_failed_submission_keeps_fields_and_renews_challenge() {
        let mut form = form();
        form.switch_to_simple().unwrap();
        form.update(LeadFieldsPatch {
            name: Some("Grace".to_string()),
            email: Some("grace@example.org".to_string()),
            message: Some("Hello".to_string()),
            challenge_answer: Some("7".to_string()),
            ..patch()
        })
        .unwrap();
        form.begin_submission().unwrap();

        form.complete_submission(&SubmissionOutcome::Failed {
            message: "email us".to_string(),
        });
        assert!(form.fields().challenge_answer.is_empty());
        assert_eq!(form.fields().name, "Grace");
        assert!(matches!(form.phase(), FormPhase::Failed { .. }));

        form.acknowledge().unwrap();
        assert_eq!(form.mode(), FormMode::Simple);
        assert_eq!(form.fields().message, "Hello");
    }

    #[test]
    fn test_simple_form_requires_message() {
        let mut form = form();
        form.switch_to_simple().unwrap();
        form.update(LeadFieldsPatch {
            name: Some("Grace".to_string()),
            email: Some("grace@example.org".to_string()),
            challenge_answer: Some("7".to_string()),
            ..patch()
        })
        .unwrap();
        let result = form.begin_submission();
        assert!(matches!(result, Err(LeadFormError::Validation(ref e)) if e.contains_key("message")));
        assert_eq!(form.advance(), Err(LeadFormError::NotInWizard));
    }

    #[test]
    fn test_simple_form_payload_and_return_to_wizard() {
        let mut form = form();
        walk_to_contact_step(&mut form);
        form.switch_to_simple().unwrap();
        form.update(LeadFieldsPatch {
            name: Some("Grace".to_string()),
            email: Some("grace@example.org".to_string()),
            message: Some("Can we talk?".to_string()),
            challenge_answer: Some("7".to_string()),
            ..patch()
        })
        .unwrap();
        let payload = form.begin_submission().unwrap();
        assert_eq!(payload.subject, "Website contact form");
        assert_eq!(payload.message, "Can we talk?");
        assert_eq!(payload.form_type.as_deref(), Some("simple_contact"));

        form.complete_submission(&SubmissionOutcome::Failed {
            message: "down".to_string(),
        });
        form.switch_to_wizard().unwrap();
        assert_eq!(form.mode(), FormMode::Wizard);
        assert_eq!(form.step(), WizardStep::ProjectType);
    }

    #[test]
    fn test_prefill_from_estimate_keeps_existing_input() {
        let catalog = Catalog::embedded().unwrap();
        let selection = Selection {
            service_ids: ["cloud-migration", "web-development"]
                .iter()
                .map(|id| id.to_string())
                .collect(),
            ..Default::default()
        };
        let estimate =
            PricingService::compute_estimate(&selection, &catalog.services, &catalog.pricing)
                .unwrap();
        let estimate_id = EstimateId::generate(&mut rand::thread_rng());

        let mut form = form();
        form.update(LeadFieldsPatch {
            budget: Some(Some(BudgetRange::Over100k)),
            ..patch()
        })
        .unwrap();
        form.prefill(&selection, &estimate, Some(&estimate_id), &catalog.services)
            .unwrap();

        let fields = form.fields();
        assert_eq!(fields.project_type, Some(ProjectType::WebApplication));
        assert_eq!(fields.timeline, Some(ProjectTimeline::ThreeToSixMonths));
        assert_eq!(fields.budget, Some(BudgetRange::Over100k));
        assert!(fields.description.contains(&estimate_id.reference()));
        assert!(fields.description.contains("Cloud Migration"));
        assert!(fields.description.contains("$10,000.00"));
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("someone@example.com"));
        assert!(is_valid_email("first.last+tag@sub.example.co.uk"));
        assert!(!is_valid_email("someone@example"));
        assert!(!is_valid_email("someone.example.com"));
        assert!(!is_valid_email("some one@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_view_hides_answer() {
        let form = form();
        let view = serde_json::to_value(form.view()).unwrap();
        assert_eq!(view["challenge_question"], "What is 3 + 4?");
        assert_eq!(view["step_index"], 0);
        assert_eq!(view["phase"]["state"], "editing");
        assert!(!view.to_string().contains("expected"));
    }
}
