use contactform::form::{FieldKey, FieldLens, FormModel};

#[derive(Clone, contactform::form::FormModel)]
struct CallbackRequest {
    phone: String,
    best_time: String,
}

fn main() {
    let fields = CallbackRequest::fields();
    let lens = fields.best_time();
    let mut model = CallbackRequest {
        phone: "555-0100".to_string(),
        best_time: "morning".to_string(),
    };
    lens.set(&mut model, "evening".to_string());
    assert_eq!(lens.key().as_str(), "best_time");
    assert_eq!(lens.get(&model), "evening");
    assert_eq!(fields.phone().get(&model), "555-0100");
    assert_eq!(
        CallbackRequest::keys(),
        &[FieldKey::new("phone"), FieldKey::new("best_time")]
    );
}
