//! Plain text views of the API's collections for the terminal.

use std::fmt::Write;

use crate::{
    category::Category,
    expense::Expense,
    format::{fit_label, format_currency, paint},
    person::Person,
    receipt::ScanResult,
    user::{CurrentUser, User, UserId},
};

const TITLE_WIDTH: usize = 36;
const AMOUNT_WIDTH: usize = 14;
const NAME_WIDTH: usize = 24;

/// Each expense as a title line with the amount, followed by its category,
/// date and note.
pub fn render_expenses(expenses: &[Expense]) -> String {
    if expenses.is_empty() {
        return "No expenses yet.\n".to_owned();
    }

    let mut output = String::new();

    for expense in expenses {
        let mut details = format!("{} · {}", expense.category, expense.date);
        if let Some(note) = &expense.note {
            details.push_str(" · ");
            details.push_str(note);
        }

        let _ = writeln!(
            output,
            "{}{:>AMOUNT_WIDTH$}",
            fit_label(&format!("[{}] {}", expense.id, expense.title), TITLE_WIDTH),
            format_currency(expense.amount)
        );
        let _ = writeln!(output, "      {details}");
    }

    output
}

/// Categories with a color swatch.
pub fn render_categories(categories: &[Category], use_color: bool) -> String {
    if categories.is_empty() {
        return "No categories yet.\n".to_owned();
    }

    let mut output = String::new();

    for category in categories {
        let swatch = if use_color {
            paint("■", &category.color)
        } else {
            "■".to_owned()
        };

        let _ = writeln!(
            output,
            "[{}] {swatch} {} {}",
            category.id,
            fit_label(&category.name, NAME_WIDTH),
            category.color
        );
    }

    output
}

/// Persons with their type, RUT and relation.
pub fn render_persons<'a>(persons: impl IntoIterator<Item = &'a Person>) -> String {
    let mut output = String::new();

    for person in persons {
        let relation = person
            .relation
            .map(|relation| format!(" · {relation}"))
            .unwrap_or_default();

        let _ = writeln!(
            output,
            "[{}] {} {} · {}{relation}",
            person.id,
            fit_label(&person.name, NAME_WIDTH),
            person.kind,
            person.rut
        );
    }

    if output.is_empty() {
        output.push_str("No persons yet.\n");
    }

    output
}

/// The admin user table. The signed-in user's row is marked "(you)".
pub fn render_users(users: &[User], current_user_id: UserId) -> String {
    let mut output = format!(
        "{:<5} {} {} {:<6} {:<9} Joined\n",
        "ID",
        fit_label("Username", 16),
        fit_label("Email", 28),
        "Role",
        "Status"
    );

    for user in users {
        let username = if user.id == current_user_id {
            format!("{} (you)", user.username)
        } else {
            user.username.clone()
        };
        let role = if user.is_admin { "Admin" } else { "User" };
        let status = if user.is_active { "Active" } else { "Inactive" };

        let _ = writeln!(
            output,
            "{:<5} {} {} {role:<6} {status:<9} {}",
            user.id,
            fit_label(&username, 16),
            fit_label(&user.email, 28),
            user.joined_on()
        );
    }

    output
}

/// The signed-in user and the person that represents them.
pub fn render_profile(user: &CurrentUser) -> String {
    let mut output = format!(
        "Username: {}\nEmail:    {}\nRole:     {}\n",
        user.username,
        user.email,
        user.role()
    );

    match &user.profile_person {
        Some(person) => {
            let _ = writeln!(output, "Name:     {}", person.name);
            let _ = writeln!(output, "Type:     {}", person.kind);
            let _ = writeln!(output, "RUT:      {}", person.rut);
        }
        None => output.push_str("No profile yet. Set one with `xpends profile set`.\n"),
    }

    output
}

/// What a receipt scan found, and which known person issued the receipt.
pub fn render_scan_result(scan: &ScanResult, provider: Option<&Person>) -> String {
    let not_found = "not found";
    let amount = scan
        .amount
        .map(format_currency)
        .unwrap_or_else(|| not_found.to_owned());

    let mut output = format!(
        "Amount:   {amount}\nRUT:      {}\nIssuer:   {}\n",
        scan.rut.as_deref().unwrap_or(not_found),
        scan.provider_name.as_deref().unwrap_or(not_found)
    );

    match provider {
        Some(person) => {
            let _ = writeln!(output, "Provider: [{}] {}", person.id, person.name);
        }
        None => output.push_str("Provider: no person with this RUT\n"),
    }

    output
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        category::Category,
        expense::Expense,
        person::{Person, PersonType, Relation},
        receipt::ScanResult,
        user::{CurrentUser, User},
        views::{
            render_categories, render_expenses, render_persons, render_profile,
            render_scan_result, render_users,
        },
    };

    fn person(id: i64, name: &str, relation: Option<Relation>) -> Person {
        Person {
            id,
            name: name.to_owned(),
            kind: PersonType::Company,
            rut: "76.123.456-7".to_owned(),
            relation,
        }
    }

    #[test]
    fn empty_expense_list() {
        assert_eq!(render_expenses(&[]), "No expenses yet.\n");
    }

    #[test]
    fn expense_lines_show_details_and_amount() {
        let expense = Expense {
            id: 7,
            title: "Groceries".to_owned(),
            amount: 1234.5,
            category: "Food".to_owned(),
            date: date!(2024 - 01 - 05),
            note: Some("weekly shop".to_owned()),
            provider_id: None,
            recipient_id: None,
            provider: None,
            recipient: None,
        };

        let text = render_expenses(&[expense]);

        assert!(text.starts_with("[7] Groceries"), "{text}");
        assert!(text.contains("$1,234.50"), "{text}");
        assert!(text.contains("Food · 2024-01-05 · weekly shop"), "{text}");
    }

    #[test]
    fn categories_show_color() {
        let categories = [Category {
            id: 1,
            name: "Food".to_owned(),
            color: "#ff0000".to_owned(),
        }];

        let plain = render_categories(&categories, false);
        let colored = render_categories(&categories, true);

        assert!(plain.contains("#ff0000"), "{plain}");
        assert!(!plain.contains('\x1b'), "{plain}");
        assert!(colored.contains("\x1b[38;2;255;0;0m■"), "{colored}");
        assert_eq!(render_categories(&[], false), "No categories yet.\n");
    }

    #[test]
    fn persons_show_relation_when_associated() {
        let persons = [
            person(1, "Acme Market", None),
            person(2, "Jane Doe", Some(Relation::Myself)),
        ];

        let text = render_persons(&persons);

        assert!(text.contains("Company · 76.123.456-7\n"), "{text}");
        assert!(text.contains("· Self"), "{text}");
        assert_eq!(render_persons(&[] as &[Person]), "No persons yet.\n");
    }

    #[test]
    fn users_table_marks_signed_in_user() {
        let users = [
            User {
                id: 1,
                username: "root".to_owned(),
                email: "root@example.com".to_owned(),
                is_admin: true,
                is_active: true,
                created_at: "2024-01-01T09:30:00".to_owned(),
            },
            User {
                id: 2,
                username: "jane".to_owned(),
                email: "jane@example.com".to_owned(),
                is_admin: false,
                is_active: false,
                created_at: "2024-02-03T10:00:00".to_owned(),
            },
        ];

        let text = render_users(&users, 1);
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[1].contains("root (you)"), "{text}");
        assert!(lines[1].contains("Admin"), "{text}");
        assert!(lines[2].contains("Inactive"), "{text}");
        assert!(lines[2].ends_with("2024-02-03"), "{text}");
        assert!(!lines[2].contains("(you)"), "{text}");
    }

    #[test]
    fn profile_without_person_suggests_setting_one() {
        let user = CurrentUser {
            id: 2,
            username: "jane".to_owned(),
            email: "jane@example.com".to_owned(),
            is_admin: false,
            profile_person_id: None,
            profile_person: None,
        };

        let text = render_profile(&user);

        assert!(text.contains("Role:     User"), "{text}");
        assert!(text.contains("xpends profile set"), "{text}");
    }

    #[test]
    fn scan_result_shows_missing_fields() {
        let scan = ScanResult {
            amount: Some(12990.0),
            rut: None,
            provider_name: None,
            raw_text: None,
        };

        let text = render_scan_result(&scan, None);

        assert!(text.contains("$12,990.00"), "{text}");
        assert!(text.contains("RUT:      not found"), "{text}");
        assert!(text.contains("no person with this RUT"), "{text}");
    }
}
