pub mod forms;
pub mod models;

pub use forms::{
    ContactForm, ForgotPasswordForm, Form, LoginForm, NewsletterForm, ResetPasswordForm,
    ServiceRequestForm, SignupForm,
};
pub use models::{ContactMessage, Model, NewsletterSubscriber, ServiceRequest, User};
