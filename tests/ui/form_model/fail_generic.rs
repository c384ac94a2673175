#![allow(dead_code)]

use contactform::form::FormModel;

#[derive(FormModel)]
struct Draft<T> {
    value: T,
}

fn main() {}
