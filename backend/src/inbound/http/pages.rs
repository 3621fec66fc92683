//! HTML pages rendered with maud.

use maud::{html, Markup, DOCTYPE};

use crate::domain::EmailRecord;

fn layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
            }
            body {
                (content)
            }
        }
    }
}

/// Upload form for `GET /`.
pub fn index() -> Markup {
    layout(
        "Image converter",
        html! {
            h1 { "Convert an image" }
            form method="post" action="/" enctype="multipart/form-data" {
                p {
                    input type="file" name="file" required;
                }
                p {
                    label for="format" { "Output format " }
                    select name="format" id="format" {
                        option value="jpg" { "JPEG" }
                        option value="png" { "PNG" }
                        option value="webp" { "WebP" }
                        option value="pdf" { "PDF" }
                        option value="tiff" { "TIFF" }
                    }
                }
                button type="submit" { "Convert" }
            }
        },
    )
}

/// Email form for `GET /signup`.
pub fn signup() -> Markup {
    layout(
        "Sign up to continue",
        html! {
            h1 { "Sign up to continue" }
            p { "You have used your free conversions for today. Leave your email to keep going." }
            form method="post" action="/signup" {
                input type="email" name="email" placeholder="you@example.com" required;
                button type="submit" { "Continue" }
            }
        },
    )
}

/// Admin table for `GET /emails`, newest record first.
pub fn emails(records: &[EmailRecord]) -> Markup {
    layout(
        "Captured emails",
        html! {
            h1 { "Captured emails" }
            p { (records.len()) " record(s). " a href="/emails.csv" { "Download CSV" } }
            table border="1" {
                thead {
                    tr { th { "Timestamp" } th { "IP" } th { "Email" } }
                }
                tbody {
                    @for record in records {
                        tr {
                            td { (record.timestamp) }
                            td { (record.ip) }
                            td { (record.email) }
                        }
                    }
                }
            }
        },
    )
}
