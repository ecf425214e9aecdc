// src/mail/templates.rs

//! Subjects and HTML bodies for every transactional email.

use chrono::NaiveDate;

use super::{OutgoingEmail, Recipient};
use crate::{
    models::{
        application::{ApplicationStatus, Interview, InterviewMode, is_web_link},
        offer::OfferLetter,
    },
    services::otp::OTP_TTL_SECS,
    utils::html::{escape, sanitize},
};

const BODY: &str = "font-family:'Segoe UI',Tahoma,Geneva,Verdana,sans-serif;background-color:#f0f4f8;color:#1a202c;margin:0;padding:20px";
const CONTAINER: &str = "max-width:650px;margin:0 auto;background-color:#ffffff;border-radius:16px;overflow:hidden";
const HEADER: &str = "background:linear-gradient(135deg,#667eea 0%,#764ba2 100%);padding:32px 30px;text-align:center;color:#ffffff";
const CONTENT: &str = "padding:36px 32px;font-size:16px;line-height:1.8;color:#374151";
const CARD: &str = "background:#f8fafc;border:2px solid #e2e8f0;border-radius:12px;padding:20px;margin:24px 0";
const FOOTER: &str = "padding:20px;text-align:center;font-size:13px;color:#6b7280";

fn layout(heading: &str, content: &str, footer: &str) -> String {
    format!(
        r#"<html>
  <body style="{BODY}">
    <div style="{CONTAINER}">
      <div style="{HEADER}"><h1 style="margin:0">{heading}</h1></div>
      <div style="{CONTENT}">{content}</div>
      <div style="{FOOTER}">{footer}</div>
    </div>
  </body>
</html>"#
    )
}

fn automated_footer(company: &str) -> String {
    format!(
        "This is an automated email from {}. Please do not reply.",
        escape(company)
    )
}

fn greeting(name: &str) -> String {
    if name.trim().is_empty() {
        "<p>Hello,</p>".to_string()
    } else {
        format!("<p>Dear {},</p>", escape(name))
    }
}

/// Confirmation sent right after an application is submitted.
pub fn application_received(to: Recipient, job_title: &str, company: &str) -> OutgoingEmail {
    let name = to.name.clone().unwrap_or_default();
    let content = format!(
        "{}<p>Thank you for applying for the position of <strong>{}</strong>.</p>\
         <div style=\"{CARD}\"><p><strong>Your application has been successfully submitted.</strong></p>\
         <p>Our recruitment team will review your application and contact you soon.</p></div>\
         <p>Best regards,<br/>{} Recruitment Team</p>",
        greeting(&name),
        escape(job_title),
        escape(company),
    );
    OutgoingEmail {
        subject: format!("Application Received - {}", job_title),
        html: layout("Application Received", &content, &automated_footer(company)),
        to,
    }
}

/// One-time code email. The code sits in an element of class `otp-code`.
pub fn verification_code(to: Recipient, code: &str, company: &str) -> OutgoingEmail {
    let minutes = OTP_TTL_SECS / 60;
    let content = format!(
        "<p>Thank you for signing up. Please use the verification code below to complete your registration:</p>\
         <div class=\"otp-code\" style=\"{CARD};text-align:center;font-size:36px;letter-spacing:8px;font-weight:700\">{}</div>\
         <p><strong>This code will expire in {} minutes.</strong></p>\
         <p>If you didn't request this code, please ignore this email. Your account will not be created without verification.</p>",
        escape(code),
        minutes,
    );
    OutgoingEmail {
        subject: format!("Your {} Verification Code", company),
        html: layout("Verify Your Email", &content, &automated_footer(company)),
        to,
    }
}

fn interview_rows(interview: &Interview) -> String {
    let mut rows = format!(
        "<tr><td><strong>Date</strong></td><td>{}</td></tr>\
         <tr><td><strong>Time</strong></td><td>{}</td></tr>\
         <tr><td><strong>Mode</strong></td><td>{}</td></tr>",
        escape(&interview.date),
        escape(&interview.time),
        interview.mode.label(),
    );
    match interview.mode {
        InterviewMode::Online => {
            if let Some(link) = interview.meeting_link.as_deref() {
                let cell = if is_web_link(link) {
                    format!("<a href=\"{0}\">{0}</a>", escape(link))
                } else {
                    escape(link)
                };
                rows.push_str(&format!(
                    "<tr><td><strong>Meeting Link</strong></td><td>{}</td></tr>",
                    cell
                ));
            }
        }
        InterviewMode::Offline => {
            if let Some(location) = interview.location.as_deref() {
                rows.push_str(&format!(
                    "<tr><td><strong>Location</strong></td><td>{}</td></tr>",
                    escape(location)
                ));
            }
        }
    }
    rows
}

/// Notification for a status reached through a lifecycle transition.
/// `Pending` has no notification.
pub fn status_update(
    to: Recipient,
    status: ApplicationStatus,
    job_title: &str,
    interview: Option<&Interview>,
    company: &str,
) -> Option<OutgoingEmail> {
    let name = to.name.clone().unwrap_or_default();
    let title = escape(job_title);
    let (subject, heading, body) = match status {
        ApplicationStatus::Pending => return None,
        ApplicationStatus::Shortlisted => {
            let details = interview
                .map(|i| {
                    format!("<div style=\"{CARD}\"><table>{}</table></div>", interview_rows(i))
                })
                .unwrap_or_default();
            (
                format!("Interview Invitation - {}", job_title),
                "Interview Invitation",
                format!(
                    "<p>Congratulations! You have been shortlisted for the position of <strong>{title}</strong>.</p>\
                     <p>Your qualifications and experience have impressed our recruitment team, and we would like to invite you for an interview.</p>\
                     {details}\
                     <p>Please be available a few minutes before the scheduled time.</p>"
                ),
            )
        }
        ApplicationStatus::Rejected => (
            format!("Application Update - {}", job_title),
            "Application Update",
            format!(
                "<p>Thank you for your interest in the position of <strong>{title}</strong> and for the time you invested in the process.</p>\
                 <p>After careful consideration, we have decided to move forward with other candidates whose qualifications more closely match our current needs.</p>\
                 <p>We encourage you to apply for future openings that match your profile.</p>"
            ),
        ),
        ApplicationStatus::OnHold => (
            format!("Application Status - {}", job_title),
            "Application On Hold",
            format!(
                "<p>Your application for <strong>{title}</strong> is currently on hold while we complete our review.</p>\
                 <p>We are taking additional time to:</p>\
                 <ul><li>Thoroughly assess all qualified candidates</li>\
                 <li>Ensure fair consideration for every applicant</li>\
                 <li>Match the best candidate with our team's requirements</li></ul>\
                 <p>We will contact you as soon as a decision has been made.</p>"
            ),
        ),
        ApplicationStatus::Selected => (
            format!("Congratulations! Job Offer - {}", job_title),
            "Congratulations!",
            format!(
                "<p>We are delighted to inform you that you have been selected for the position of <strong>{title}</strong>.</p>\
                 <p>Our team was impressed by your skills, your professional experience and your enthusiasm.</p>\
                 <p>Our HR team will send your formal offer letter with the full terms shortly.</p>"
            ),
        ),
    };

    let content = format!(
        "{}{}<p>Best regards,<br/>{} Recruitment Team</p>",
        greeting(&name),
        body,
        escape(company)
    );
    Some(OutgoingEmail {
        subject,
        html: layout(heading, &content, &automated_footer(company)),
        to,
    })
}

/// Formats an amount with comma thousands separators: 1200000 -> "1,200,000".
pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// "June 1, 2025"
pub fn format_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Formal offer letter. Salary and joining date must already be present.
pub fn offer_letter(
    offer: &OfferLetter,
    salary: u64,
    joining_date: NaiveDate,
    today: NaiveDate,
    company: &str,
) -> OutgoingEmail {
    let mut rows = format!(
        "<tr><td><strong>Position</strong></td><td>{}</td></tr>\
         <tr><td><strong>Department</strong></td><td>{}</td></tr>\
         <tr><td><strong>Annual Salary</strong></td><td>{}</td></tr>\
         <tr><td><strong>Joining Date</strong></td><td>{}</td></tr>",
        escape(&offer.role),
        escape(&offer.department),
        format_amount(salary),
        format_date(joining_date),
    );
    if !offer.location.trim().is_empty() {
        rows.push_str(&format!(
            "<tr><td><strong>Location</strong></td><td>{}</td></tr>",
            escape(&offer.location)
        ));
    }

    let terms = if offer.additional_terms.trim().is_empty() {
        String::new()
    } else {
        format!(
            "<div style=\"{CARD}\"><p><strong>Additional Terms</strong></p>{}</div>",
            sanitize(&offer.additional_terms)
        )
    };

    let content = format!(
        "<p>Date: {}</p>\
         {}\
         <p>We are pleased to offer you the position of <strong>{}</strong> in the {} department at {}.</p>\
         <p>The details of your employment are as follows:</p>\
         <div style=\"{CARD}\"><table>{}</table></div>\
         {}\
         <p><strong>Important:</strong> This offer is contingent upon successful completion of background verification and reference checks.</p>\
         <p>We are excited about the prospect of you joining our team and look forward to your positive response. \
         Please confirm your acceptance by replying to this email at your earliest convenience.</p>\
         <p>Sincerely,<br/>Human Resources<br/>{}</p>",
        format_date(today),
        greeting(&offer.candidate_name),
        escape(&offer.role),
        escape(&offer.department),
        escape(company),
        rows,
        terms,
        escape(company),
    );

    OutgoingEmail {
        subject: format!("Offer of Employment - {}", offer.role),
        html: layout(
            "Offer of Employment",
            &content,
            &format!(
                "This is an official offer letter from {}. For questions, please contact our HR team.",
                escape(company)
            ),
        ),
        to: Recipient::new(offer.candidate_email.clone(), Some(offer.candidate_name.clone())),
    }
}
