//! Demo user registration form, driven by the CLI and the scenario runner.
use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::form::lift::lift2;
use crate::form::{when, Form};
use crate::formlet::{self, Selection};
use crate::validation::Validation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub birthdate: Option<NaiveDateTime>,
    pub choice: Option<i32>,
    pub email: Option<String>,
    pub favorite_color: String,
    pub fullname: FullName,
    pub list: Vec<String>,
    pub message: String,
    pub num: f64,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullName {
    pub name: String,
    pub surname: String,
}

pub fn init_user() -> User {
    User {
        birthdate: None,
        choice: Some(3),
        email: Some("john@doe.com".to_string()),
        favorite_color: "#d64343".to_string(),
        fullname: FullName {
            name: "John".to_string(),
            surname: "Doe".to_string(),
        },
        list: Vec::new(),
        message: String::new(),
        num: 0.0,
        phone: "911".to_string(),
    }
}

fn choices() -> Vec<(String, i32)> {
    vec![("a".into(), 1), ("b".into(), 2), ("c".into(), 3), ("d".into(), 4)]
}

fn birthdate(user: &User) -> Form<Option<NaiveDateTime>> {
    formlet::month().form("birthdate", user.birthdate).group("birthdate")
}

fn choice(user: &User) -> Form<Option<i32>> {
    formlet::choice("foo", choices(), user.choice.map(Selection::Value))
        .group("choice")
        .map(Some)
}

fn email(user: &User) -> Form<Option<String>> {
    when(
        formlet::boolean().form("wants newsletter", user.email.is_some()),
        formlet::email().form("email", user.email.clone().unwrap_or_default()),
    )
    .group("email")
}

fn favorite_color(user: &User) -> Form<String> {
    formlet::color().form("color", user.favorite_color.clone()).group("favorite color")
}

fn fullname(user: &User) -> Form<FullName> {
    lift2(
        |name, surname| FullName { name, surname },
        formlet::netext().form("name", user.fullname.name.clone()),
        formlet::netext().form("surname", user.fullname.surname.clone()),
    )
    .group("fullname")
}

fn texts(user: &User) -> Form<Vec<String>> {
    let items = user.list.iter().map(|s| formlet::text().form("list item", s.clone())).collect();
    formlet::list(formlet::netext().form_default("list item"), items)
        .validated(|xs: Vec<String>| {
            if xs.iter().collect::<HashSet<_>>().len() == xs.len() {
                Validation::Success(xs)
            } else {
                Validation::Warning(vec!["Contains duplicates".to_string()], xs)
            }
        })
        .group("texts")
}

fn message(user: &User) -> Form<String> {
    formlet::netextarea().form("message", user.message.clone()).group("message")
}

fn num(user: &User) -> Form<f64> {
    formlet::range()
        .with_attr("step", 10)
        .with_attr("min", 100)
        .with_attr("max", 1000)
        .form("num", user.num)
        .group("num")
}

fn phone(user: &User) -> Form<String> {
    formlet::tel().form("phone", user.phone.clone()).group("phone")
}

/// The whole registration form, prefilled from `user`.
pub fn user_form(user: &User) -> Form<User> {
    crate::lift!(
        |birthdate, choice, email, favorite_color, fullname, list, message, num, phone| User {
            birthdate,
            choice,
            email,
            favorite_color,
            fullname,
            list,
            message,
            num,
            phone,
        },
        birthdate(user),
        choice(user),
        email(user),
        favorite_color(user),
        fullname(user),
        texts(user),
        message(user),
        num(user),
        phone(user),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use serde_json::json;

    #[test]
    fn initial_user_only_lacks_a_message() {
        let user = init_user();
        let value = user_form(&user).read();
        assert_eq!(value, Validation::Warning(vec!["Must be non-empty".to_string()], user));
    }

    #[test]
    fn field_names_are_qualified_by_group() {
        let outline = user_form(&init_user()).outline();
        let names: Vec<String> = outline.fields().into_iter().map(|(n, _)| n).collect();
        assert_eq!(
            names,
            vec![
                "birthdate.birthdate",
                "choice.foo",
                "email.wants newsletter",
                "email.email",
                "favorite color.color",
                "fullname.name",
                "fullname.surname",
                "message.message",
                "num.num",
                "phone.phone",
            ]
        );
        assert_eq!(outline.find_field("choice.foo").unwrap().selected.as_deref(), Some("c"));
        assert!(outline.find_list("texts").is_some());
    }

    #[test]
    fn editing_a_session_builds_the_user() {
        let mut session = Session::new(user_form(&init_user()));
        session.set_json("message.message", &json!("hello")).unwrap();
        session.set_json("email.wants newsletter", &json!(false)).unwrap();
        session.set_json("choice.foo", &json!("a")).unwrap();
        session.set_json("birthdate.birthdate", &json!("1990-05")).unwrap();

        let user = session.value().clone().into_value().unwrap();
        assert!(session.value().is_success());
        assert_eq!(user.message, "hello");
        assert_eq!(user.email, None);
        assert_eq!(user.choice, Some(1));
        assert_eq!(user.birthdate.map(|d| d.format("%Y-%m").to_string()), Some("1990-05".to_string()));
    }

    #[test]
    fn duplicate_texts_warn() {
        let mut user = init_user();
        user.message = "hi".into();
        user.list = vec!["x".into(), "x".into()];
        let value = user_form(&user).read();
        assert_eq!(value.errors(), ["Contains duplicates".to_string()]);
    }

    #[test]
    fn users_round_trip_through_json() {
        let json = serde_json::to_value(init_user()).unwrap();
        assert_eq!(json["favoriteColor"], json!("#d64343"));
        let back: User = serde_json::from_value(json).unwrap();
        assert_eq!(back, init_user());
    }
}
