//! Presence checks for static assets, templates and project config files.

use crate::doctor::report::Detail;
use crate::doctor::{Check, CheckContext, CheckFuture, CheckOutcome};
use std::fs;
use std::path::Path;

pub const REQUIRED_TEMPLATES: [(&str, &str); 9] = [
    ("base.html", "Base template"),
    ("home.html", "Home page"),
    ("services.html", "Services page"),
    ("contact.html", "Contact page"),
    ("login.html", "Login page"),
    ("signup.html", "Signup page"),
    ("dashboard.html", "Dashboard page"),
    ("forgot_password.html", "Forgot password page"),
    ("reset_password.html", "Reset password page"),
];

pub const ERROR_TEMPLATES: [&str; 2] = ["404.html", "500.html"];

pub const CONFIG_FILES: [(&str, &str); 8] = [
    (".env", "Environment variables (local)"),
    (".env.example", "Environment template"),
    ("Cargo.toml", "Package manifest"),
    ("Cargo.lock", "Locked dependency versions"),
    ("Dockerfile", "Container image build"),
    ("render.yaml", "Render configuration"),
    ("vercel.json", "Vercel configuration"),
    (".gitignore", "Git ignore rules"),
];

pub struct StaticFilesCheck;

impl Check for StaticFilesCheck {
    fn name(&self) -> &'static str {
        "Static Files"
    }

    fn title(&self) -> &'static str {
        "STATIC FILES CHECK"
    }

    fn run<'a>(&'a self, ctx: &'a CheckContext) -> CheckFuture<'a> {
        Box::pin(async move { check_static_files(&ctx.root) })
    }
}

/// Names of the entries in `dir` that satisfy `keep`, sorted.
fn list_dir(dir: &Path, keep: impl Fn(&str) -> bool) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .filter_map(|e| e.file_name().into_string().ok())
                .filter(|name| keep(name))
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

fn check_static_files(root: &Path) -> CheckOutcome {
    let mut detail = Detail::default();

    let css = detail.block("CSS Files:");
    let css_dir = root.join("static").join("css");
    if !css_dir.is_dir() {
        css.fail("CSS directory not found");
        return CheckOutcome::new(false, detail);
    }
    for name in list_dir(&css_dir, |name| name.ends_with(".css")) {
        css.pass(name);
    }

    let images = detail.block("Image Directory:");
    let img_dir = root.join("static").join("images");
    if img_dir.is_dir() {
        let count = list_dir(&img_dir, |name| !name.starts_with('.')).len();
        images
            .pass("Images directory exists")
            .note(format!("  {count} image file(s)"));
    } else {
        images.warn("Images directory not found");
    }

    CheckOutcome::new(true, detail)
}

pub struct TemplatesCheck;

impl Check for TemplatesCheck {
    fn name(&self) -> &'static str {
        "Templates"
    }

    fn title(&self) -> &'static str {
        "TEMPLATES CHECK"
    }

    fn run<'a>(&'a self, ctx: &'a CheckContext) -> CheckFuture<'a> {
        Box::pin(async move { check_templates(&ctx.root) })
    }
}

fn check_templates(root: &Path) -> CheckOutcome {
    let mut detail = Detail::default();

    let template_dir = root.join("templates");
    if !template_dir.is_dir() {
        detail
            .block("Main Templates:")
            .fail("Templates directory not found");
        return CheckOutcome::new(false, detail);
    }

    let mut all_present = true;
    let main = detail.block("Main Templates:");
    for (template, description) in REQUIRED_TEMPLATES {
        if template_dir.join(template).is_file() {
            main.pass(format!("{template} - {description}"));
        } else {
            main.fail(format!("{template} - MISSING - {description}"));
            all_present = false;
        }
    }

    // Error pages are reported but do not gate the check.
    let errors = detail.block("Error Templates:");
    let error_dir = template_dir.join("errors");
    if error_dir.is_dir() {
        for template in ERROR_TEMPLATES {
            if error_dir.join(template).is_file() {
                errors.pass(template);
            } else {
                errors.fail(format!("{template} - MISSING"));
            }
        }
    } else {
        errors.warn("Errors directory not found");
    }

    CheckOutcome::new(all_present, detail)
}

/// Informational report on project config files; never part of the pass/fail result.
#[must_use]
pub fn config_files_report(root: &Path) -> Detail {
    let mut detail = Detail::default();
    let block = detail.block("Configuration Files:");
    for (file, description) in CONFIG_FILES {
        if root.join(file).exists() {
            block.pass(format!("{file} - {description}"));
        } else if file == ".env" {
            block.warn(format!("{file} - {description}"));
        } else {
            block.fail(format!("{file} - {description}"));
        }
    }
    detail
}
