//! Developer profiles with experience, education and social links.

use chrono::{DateTime, NaiveDate, Utc};
use devlink_accounts::{non_blank, FieldError, FieldErrorCode, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Result, SocialError};

/// Unique identifier for a profile.
pub type ProfileId = Uuid;

/// Unique identifier for an experience or education entry.
pub type EntryId = Uuid;

/// A user's public profile. At most one exists per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Unique profile ID.
    pub id: ProfileId,
    /// Owning user.
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Professional status, e.g. "Developer".
    pub status: String,
    /// Skills in the order given.
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_username: Option<String>,
    /// Social network links.
    #[serde(default)]
    pub social: SocialLinks,
    /// Experience entries, most recent first.
    #[serde(default)]
    pub experience: Vec<Experience>,
    /// Education entries, most recent first.
    #[serde(default)]
    pub education: Vec<Education>,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// Create a profile from a first submission.
    ///
    /// `status` and `skills` are required here and nowhere else.
    pub fn create(user_id: UserId, fields: &ProfileFields) -> Result<Self> {
        let status = non_blank(fields.status.as_deref());
        let skills = fields.skills.as_deref().map(parse_skills).unwrap_or_default();

        let mut errors = Vec::new();
        if status.is_none() {
            errors.push(FieldError::missing("status", "Status is required"));
        }
        if skills.is_empty() {
            errors.push(FieldError::missing("skills", "Skills is required"));
        }
        if !errors.is_empty() {
            return Err(SocialError::Validation(errors));
        }

        let mut profile = Self {
            id: Uuid::new_v4(),
            user_id,
            company: None,
            website: None,
            location: None,
            status: status.unwrap_or_default().to_string(),
            skills,
            bio: None,
            github_username: None,
            social: SocialLinks::default(),
            experience: Vec::new(),
            education: Vec::new(),
            created_at: Utc::now(),
        };
        profile.apply(fields);
        Ok(profile)
    }

    /// Overwrite every field that is present and non-blank in `fields`.
    ///
    /// Omitted or blank fields keep their prior value.
    pub fn apply(&mut self, fields: &ProfileFields) {
        set_if_present(&mut self.company, fields.company.as_deref());
        set_if_present(&mut self.website, fields.website.as_deref());
        set_if_present(&mut self.location, fields.location.as_deref());
        set_if_present(&mut self.bio, fields.bio.as_deref());
        set_if_present(&mut self.github_username, fields.github_username.as_deref());

        if let Some(status) = non_blank(fields.status.as_deref()) {
            self.status = status.to_string();
        }

        let skills = fields.skills.as_deref().map(parse_skills).unwrap_or_default();
        if !skills.is_empty() {
            self.skills = skills;
        }

        set_if_present(&mut self.social.youtube, fields.youtube.as_deref());
        set_if_present(&mut self.social.twitter, fields.twitter.as_deref());
        set_if_present(&mut self.social.facebook, fields.facebook.as_deref());
        set_if_present(&mut self.social.linkedin, fields.linkedin.as_deref());
        set_if_present(&mut self.social.github, fields.github.as_deref());
    }

    /// Prepend an experience entry.
    pub fn add_experience(&mut self, entry: Experience) {
        self.experience.insert(0, entry);
    }

    /// Remove the experience entry with the given ID.
    pub fn remove_experience(&mut self, entry_id: EntryId) -> Result<Experience> {
        let index = self
            .experience
            .iter()
            .position(|e| e.id == entry_id)
            .ok_or(SocialError::ExperienceNotFound(entry_id))?;
        Ok(self.experience.remove(index))
    }

    /// Prepend an education entry.
    pub fn add_education(&mut self, entry: Education) {
        self.education.insert(0, entry);
    }

    /// Remove the education entry with the given ID.
    pub fn remove_education(&mut self, entry_id: EntryId) -> Result<Education> {
        let index = self
            .education
            .iter()
            .position(|e| e.id == entry_id)
            .ok_or(SocialError::EducationNotFound(entry_id))?;
        Ok(self.education.remove(index))
    }

    /// Attach the owner's display data for serving.
    pub fn with_owner(self, owner: Option<ProfileOwner>) -> ProfileView {
        ProfileView {
            profile: self,
            user: owner,
        }
    }
}

fn set_if_present(slot: &mut Option<String>, value: Option<&str>) {
    if let Some(value) = non_blank(value) {
        *slot = Some(value.to_string());
    }
}

/// Social network links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
}

/// Display data for a profile's owner, looked up at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileOwner {
    pub id: UserId,
    pub name: String,
    pub avatar_url: String,
}

/// A profile as served, with its owner block.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    #[serde(flatten)]
    pub profile: Profile,
    /// Absent when the owning user no longer exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<ProfileOwner>,
}

/// Fields accepted when creating or updating a profile.
///
/// Social links are submitted flat, next to the other fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileFields {
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "githubusername")]
    pub github_username: Option<String>,
    /// Comma-delimited skills, e.g. `"js, go"`.
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub youtube: Option<String>,
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub facebook: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
}

/// Split a comma-delimited skill list, trimming entries and dropping empty ones.
pub fn parse_skills(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// A job held by the profile owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: EntryId,
    pub title: String,
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub from: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A school attended by the profile owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub id: EntryId,
    pub school: String,
    pub degree: String,
    pub field_of_study: String,
    pub from: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request to add an experience entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperienceInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub current: Option<bool>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ExperienceInput {
    /// Validate and build the entry with a fresh ID.
    pub fn validate(&self) -> Result<Experience> {
        let mut errors = Vec::new();

        let title = require(&mut errors, "title", self.title.as_deref(), "Title is required");
        let company = require(
            &mut errors,
            "company",
            self.company.as_deref(),
            "Company is required",
        );
        let span = DateSpan::validate(&mut errors, self.from.as_deref(), self.to.as_deref(), self.current);

        match (title, company, span) {
            (Some(title), Some(company), Some(span)) if errors.is_empty() => Ok(Experience {
                id: Uuid::new_v4(),
                title,
                company,
                location: non_blank(self.location.as_deref()).map(String::from),
                from: span.from,
                to: span.to,
                current: span.current,
                description: non_blank(self.description.as_deref()).map(String::from),
            }),
            _ => Err(SocialError::Validation(errors)),
        }
    }
}

/// Request to add an education entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationInput {
    #[serde(default)]
    pub school: Option<String>,
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default, alias = "fieldofstudy")]
    pub field_of_study: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub current: Option<bool>,
    #[serde(default)]
    pub description: Option<String>,
}

impl EducationInput {
    /// Validate and build the entry with a fresh ID.
    pub fn validate(&self) -> Result<Education> {
        let mut errors = Vec::new();

        let school = require(&mut errors, "school", self.school.as_deref(), "School is required");
        let degree = require(&mut errors, "degree", self.degree.as_deref(), "Degree is required");
        let field_of_study = require(
            &mut errors,
            "fieldOfStudy",
            self.field_of_study.as_deref(),
            "Field of study is required",
        );
        let span = DateSpan::validate(&mut errors, self.from.as_deref(), self.to.as_deref(), self.current);

        match (school, degree, field_of_study, span) {
            (Some(school), Some(degree), Some(field_of_study), Some(span)) if errors.is_empty() => {
                Ok(Education {
                    id: Uuid::new_v4(),
                    school,
                    degree,
                    field_of_study,
                    from: span.from,
                    to: span.to,
                    current: span.current,
                    description: non_blank(self.description.as_deref()).map(String::from),
                })
            }
            _ => Err(SocialError::Validation(errors)),
        }
    }
}

fn require(
    errors: &mut Vec<FieldError>,
    param: &str,
    value: Option<&str>,
    msg: &str,
) -> Option<String> {
    let value = non_blank(value).map(String::from);
    if value.is_none() {
        errors.push(FieldError::missing(param, msg));
    }
    value
}

/// Validated `from`/`to`/`current` triple.
struct DateSpan {
    from: NaiveDate,
    to: Option<NaiveDate>,
    current: bool,
}

impl DateSpan {
    fn validate(
        errors: &mut Vec<FieldError>,
        from: Option<&str>,
        to: Option<&str>,
        current: Option<bool>,
    ) -> Option<Self> {
        let current = current.unwrap_or(false);

        let from = match non_blank(from) {
            None => {
                errors.push(FieldError::missing("from", "From date is required"));
                None
            }
            Some(raw) => {
                let parsed = parse_date(raw);
                if parsed.is_none() {
                    errors.push(FieldError::new(
                        "from",
                        FieldErrorCode::Invalid,
                        "From date must be a valid date",
                    ));
                }
                parsed
            }
        };

        // A current position has no end date.
        let to = match non_blank(to).filter(|_| !current) {
            None => None,
            Some(raw) => {
                let parsed = parse_date(raw);
                if parsed.is_none() {
                    errors.push(FieldError::new(
                        "to",
                        FieldErrorCode::Invalid,
                        "To date must be a valid date",
                    ));
                }
                parsed
            }
        };

        let from = from?;
        if let Some(to) = to {
            if to < from {
                errors.push(FieldError::new(
                    "to",
                    FieldErrorCode::Invalid,
                    "To date cannot be before from date",
                ));
            }
        }

        Some(Self { from, to, current })
    }
}

/// Parse `YYYY-MM-DD`, or the date part of an RFC 3339 timestamp.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(input)
                .ok()
                .map(|dt| dt.date_naive())
        })
}
