//! Pure HTML builders for the two outbound email kinds: the welcome message
//! sent after a subscription and the event announcement used by broadcasts.

// Club brand colors, one per letter of the logo.
const VALENCIA: &str = "#dc3d43";
const OCEANGREEN: &str = "#3cb179";
const AZURERADIANCE: &str = "#0091ff";
const SUPERNOVA: &str = "#f7ce00";

const WEBSITE_URL: &str = "https://adsc-atmiya.in";

pub struct EventDetails {
    pub name: String,
    pub description: String,
    pub date: String,
    pub register_url: Option<String>,
}

fn logo_html() -> String {
    let letter_cell = |letter: &str, color: &str, background: &str| {
        format!(
            r#"<td style="padding: 0 2px;">
          <div style="width: 40px; height: 40px; background-color: {background}; border: 2px solid {color}; border-radius: 8px; text-align: center; line-height: 36px;">
            <span style="color: {color}; font-weight: bold; font-size: 20px; font-family: Arial, sans-serif;">{letter}</span>
          </div>
        </td>"#
        )
    };

    format!(
        r#"<table cellpadding="0" cellspacing="0" style="margin: 0 auto;">
      <tr>
        {a}
        {d}
        {s}
        {c}
      </tr>
    </table>"#,
        a = letter_cell("A", VALENCIA, "rgba(220, 61, 67, 0.2)"),
        d = letter_cell("D", OCEANGREEN, "rgba(60, 177, 121, 0.2)"),
        s = letter_cell("S", AZURERADIANCE, "rgba(0, 145, 255, 0.2)"),
        c = letter_cell("C", SUPERNOVA, "rgba(247, 206, 0, 0.2)"),
    )
}

fn footer_html(closing_line: String) -> String {
    format!(
        r#"<tr>
            <td style="background-color: #0a0a0a; padding: 30px; text-align: center; border-top: 1px solid #262626;">
              <p style="margin: 0 0 15px;">
                <span style="color: {VALENCIA}; font-size: 16px;">&#9679;</span>
                <span style="color: {OCEANGREEN}; font-size: 16px;"> &#9679; </span>
                <span style="color: {AZURERADIANCE}; font-size: 16px;">&#9679; </span>
                <span style="color: {SUPERNOVA}; font-size: 16px;">&#9679;</span>
              </p>
              <p style="color: #737373; font-size: 12px; margin: 0 0 10px;">
                Atmiya Developer Students Club | Atmiya University
              </p>
              <p style="color: #525252; font-size: 11px; margin: 0;">
                {closing_line}
              </p>
            </td>
          </tr>"#
    )
}

fn cta_button_html(url: &str, label: &str) -> String {
    format!(
        r#"<table width="100%" cellpadding="0" cellspacing="0">
                <tr>
                  <td align="center" style="padding: 20px 0;">
                    <a href="{url}" style="display: inline-block; background: linear-gradient(90deg, {VALENCIA}, {SUPERNOVA}, {OCEANGREEN}); color: #000; padding: 14px 32px; text-decoration: none; border-radius: 8px; font-weight: bold; font-size: 16px;">
                      {label}
                    </a>
                  </td>
                </tr>
              </table>"#
    )
}

/// Builds the welcome email sent right after a successful subscription.
pub fn welcome_email_html(email: &str) -> String {
    let logo = logo_html();
    let explore_button = cta_button_html(&format!("{WEBSITE_URL}/events"), "Explore Events");
    let footer = footer_html(format!(
        "You received this email because {email} subscribed to our newsletter."
    ));

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Welcome to ADSC Newsletter</title>
</head>
<body style="margin: 0; padding: 0; background-color: #0a0a0a; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;">
  <table width="100%" cellpadding="0" cellspacing="0" style="background-color: #0a0a0a; padding: 40px 20px;">
    <tr>
      <td align="center">
        <table width="600" cellpadding="0" cellspacing="0" style="background-color: #171717; border-radius: 12px; overflow: hidden;">
          <tr>
            <td style="background: linear-gradient(135deg, {VALENCIA} 0%, {SUPERNOVA} 50%, {OCEANGREEN} 100%); padding: 40px; text-align: center;">
              {logo}
              <h1 style="margin: 20px 0 0; color: #fff; font-size: 28px; font-weight: bold;">&#127881; Welcome to ADSC!</h1>
            </td>
          </tr>
          <tr>
            <td style="padding: 40px;">
              <p style="color: #e5e5e5; font-size: 16px; line-height: 1.6; margin: 0 0 20px;">
                Hey there! &#128075;
              </p>
              <p style="color: #a3a3a3; font-size: 16px; line-height: 1.6; margin: 0 0 20px;">
                Thank you for subscribing to the <strong style="color: {SUPERNOVA};">Atmiya Developer Students Club</strong> newsletter!
              </p>
              <p style="color: #a3a3a3; font-size: 16px; line-height: 1.6; margin: 0 0 20px;">
                You'll now receive updates about:
              </p>
              <ul style="color: #a3a3a3; font-size: 16px; line-height: 1.8; margin: 0 0 30px; padding-left: 20px;">
                <li>Upcoming workshops &amp; events</li>
                <li>Hackathons &amp; coding challenges</li>
                <li>Tech tutorials &amp; resources</li>
                <li>Career opportunities &amp; internships</li>
              </ul>
              {explore_button}
              <p style="color: #a3a3a3; font-size: 16px; line-height: 1.6; margin: 30px 0 0;">
                Stay curious, keep building! &#128736;
              </p>
              <p style="margin: 10px 0 0; color: {OCEANGREEN}; font-weight: bold;">
                &mdash; The ADSC Team
              </p>
            </td>
          </tr>
          {footer}
        </table>
      </td>
    </tr>
  </table>
</body>
</html>"#
    )
}

/// Builds the event announcement email. The template is a pure function of
/// the event fields and is rendered once per broadcast, identical for every
/// recipient. The register button is omitted when there is no URL.
pub fn event_email_html(event: &EventDetails) -> String {
    let logo = logo_html();
    let register_button = match &event.register_url {
        Some(url) => cta_button_html(url, "Register Now"),
        None => String::new(),
    };
    let footer = footer_html(format!(
        r#"<a href="{WEBSITE_URL}" style="color: {AZURERADIANCE}; text-decoration: none;">Visit Website</a>"#
    ));

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>New Event from ADSC</title>
</head>
<body style="margin: 0; padding: 0; background-color: #0a0a0a; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;">
  <table width="100%" cellpadding="0" cellspacing="0" style="background-color: #0a0a0a; padding: 40px 20px;">
    <tr>
      <td align="center">
        <table width="600" cellpadding="0" cellspacing="0" style="background-color: #171717; border-radius: 12px; overflow: hidden;">
          <tr>
            <td style="background: linear-gradient(135deg, {AZURERADIANCE} 0%, {OCEANGREEN} 50%, {SUPERNOVA} 100%); padding: 40px; text-align: center;">
              {logo}
              <p style="margin: 20px 0 10px; color: #fff; font-size: 14px; text-transform: uppercase; letter-spacing: 2px;">&#128197; New Event</p>
              <h1 style="margin: 0; color: #fff; font-size: 26px; font-weight: bold;">{name}</h1>
            </td>
          </tr>
          <tr>
            <td style="padding: 40px;">
              <p style="color: #a3a3a3; font-size: 16px; line-height: 1.6; margin: 0 0 20px;">
                {description}
              </p>
              <div style="background-color: #262626; border-radius: 8px; padding: 20px; margin: 20px 0; text-align: center; border-left: 4px solid {OCEANGREEN};">
                <p style="color: #737373; font-size: 12px; margin: 0 0 5px; text-transform: uppercase;">Event Date</p>
                <p style="color: {SUPERNOVA}; font-size: 24px; font-weight: bold; margin: 0;">{date}</p>
              </div>
              {register_button}
              <p style="color: #737373; font-size: 14px; margin: 20px 0 0; text-align: center;">
                Don't miss out! See you there! &#128640;
              </p>
            </td>
          </tr>
          {footer}
        </table>
      </td>
    </tr>
  </table>
</body>
</html>"#,
        name = event.name,
        description = event.description,
        date = event.date,
    )
}
