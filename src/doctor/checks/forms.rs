use crate::doctor::report::Detail;
use crate::doctor::{Check, CheckContext, CheckFuture, CheckOutcome};
use crate::domain::forms::{FormInfo, registered_forms};

pub struct FormsCheck;

impl Check for FormsCheck {
    fn name(&self) -> &'static str {
        "Forms"
    }

    fn title(&self) -> &'static str {
        "FORMS CHECK"
    }

    fn run<'a>(&'a self, _ctx: &'a CheckContext) -> CheckFuture<'a> {
        Box::pin(async move { check_forms(&registered_forms()) })
    }
}

fn check_forms(forms: &[FormInfo]) -> CheckOutcome {
    let mut detail = Detail::default();
    let mut all_ok = true;

    let block = detail.block("Forms:");
    for form in forms {
        if form.fields.is_empty() {
            block.fail(format!("{} - declares no fields", form.name));
            all_ok = false;
        } else if !(form.rejects_blank)() {
            block.fail(format!("{} - accepts a blank submission", form.name));
            all_ok = false;
        } else {
            block.pass(format!("{} ({})", form.name, form.fields.join(", ")));
        }
    }

    CheckOutcome::new(all_ok, detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doctor::report::Mark;

    #[test]
    fn test_registered_forms_pass() {
        let outcome = check_forms(&registered_forms());
        assert!(outcome.passed);
        assert_eq!(outcome.detail.lines().count(), 7);
        assert_eq!(
            outcome
                .detail
                .find(Mark::Pass, "LoginForm (email, password, remember)")
                .count(),
            1
        );
    }

    #[test]
    fn test_form_accepting_blank_input_fails() {
        let lenient = FormInfo {
            name: "LenientForm",
            fields: &["anything"],
            rejects_blank: || false,
        };
        let outcome = check_forms(&[lenient]);
        assert!(!outcome.passed);
        assert_eq!(outcome.detail.find(Mark::Fail, "blank submission").count(), 1);
    }
}
