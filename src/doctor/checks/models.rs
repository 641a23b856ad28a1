use crate::adapter::mongo::MongoUsers;
use crate::doctor::report::Detail;
use crate::doctor::{Check, CheckContext, CheckFuture, CheckOutcome};
use crate::domain::models::MODELS;
use crate::port::{USER_STORE_METHODS, UserStore};
use crate::probe::is_expected_collection;

// The MongoDB adapter must provide every `UserStore` operation; checked at build time.
const _: fn() = || {
    fn assert_user_store<T: UserStore>() {}
    assert_user_store::<MongoUsers>();
};

pub struct ModelsCheck;

impl Check for ModelsCheck {
    fn name(&self) -> &'static str {
        "Models"
    }

    fn title(&self) -> &'static str {
        "MODELS CHECK"
    }

    fn run<'a>(&'a self, _ctx: &'a CheckContext) -> CheckFuture<'a> {
        Box::pin(async move { check_models(&MODELS) })
    }
}

fn check_models(models: &[(&str, &str)]) -> CheckOutcome {
    let mut detail = Detail::default();
    let mut all_bound = true;

    let block = detail.block("Models:");
    for (name, collection) in models {
        if is_expected_collection(collection) {
            block.pass(format!("{name} model ({collection})"));
        } else {
            block.fail(format!("{name} model - unknown collection {collection}"));
            all_bound = false;
        }
    }

    // Report only: a missing operation would not have compiled.
    let methods = detail.block("User Store Operations:");
    for method in USER_STORE_METHODS {
        methods.pass(format!("UserStore::{method}()"));
    }

    CheckOutcome::new(all_bound, detail)
}
