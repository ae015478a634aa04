//! Read-only catalog of the club's published events. The newsletter service
//! only resolves and lists events; it never creates or mutates them.

#[derive(Debug, Clone, serde::Serialize)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub description: String,
    pub date: String,
    pub category: String,
    pub register_url: Option<String>,
    pub view_url: Option<String>,
}

impl Event {
    /// Preferred link for an announcement: the registration page when the
    /// event is open for signups, the event page otherwise.
    pub fn signup_url(&self) -> Option<&str> {
        self.register_url.as_deref().or(self.view_url.as_deref())
    }
}

/// Projection of an event used by the admin listing endpoint.
#[derive(Debug, Clone, serde::Serialize)]
pub struct EventSummary {
    pub id: String,
    pub name: String,
    pub date: String,
    pub category: String,
}

pub struct EventCatalog {
    events: Vec<Event>,
}

impl EventCatalog {
    pub fn new(events: Vec<Event>) -> EventCatalog {
        EventCatalog { events }
    }

    /// The club's current event list, as published on the website.
    pub fn builtin() -> EventCatalog {
        let event = |id: &str,
                     name: &str,
                     description: &str,
                     date: &str,
                     category: &str,
                     register_url: Option<&str>,
                     view_url: Option<&str>| Event {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            date: date.to_string(),
            category: category.to_string(),
            register_url: register_url.map(str::to_string),
            view_url: view_url.map(str::to_string),
        };

        EventCatalog::new(vec![
            event(
                "git-github-workshop",
                "Git & GitHub Workshop",
                "Version control from first commit to pull request, with a live collaborative repo session.",
                "August 22, 2026",
                "Workshop",
                Some("https://adsc-atmiya.in/events/git-github-workshop"),
                None,
            ),
            event(
                "hack-the-campus",
                "Hack The Campus",
                "A 24-hour hackathon to build something useful for the university, in teams of up to four.",
                "September 12-13, 2026",
                "Hackathon",
                Some("https://adsc-atmiya.in/events/hack-the-campus"),
                None,
            ),
            event(
                "flutter-study-jam",
                "Flutter Study Jam",
                "Weekly peer-led sessions building a campus events app with Flutter and Firebase.",
                "October 3, 2026",
                "Study Jam",
                None,
                Some("https://adsc-atmiya.in/events/flutter-study-jam"),
            ),
            event(
                "tech-career-talk",
                "Tech Career Talk",
                "Alumni engineers on internships, interviews and the first years on the job. Q&A included.",
                "October 17, 2026",
                "Seminar",
                None,
                None,
            ),
        ])
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|event| event.id == id)
    }

    pub fn list(&self) -> &[Event] {
        &self.events
    }

    pub fn summaries(&self) -> Vec<EventSummary> {
        self.events
            .iter()
            .map(|event| EventSummary {
                id: event.id.clone(),
                name: event.name.clone(),
                date: event.date.clone(),
                category: event.category.clone(),
            })
            .collect()
    }
}
