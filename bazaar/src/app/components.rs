//! UI components for the community services board.

use bazaar::board::{home_model, register_model, services_model};
use bazaar::{
    Board, BoardState, FirebaseAuth, FirestoreStore, FormField, Listing, ListingFilter,
    ListingForm, Notification, UiCommand, View,
};
use dioxus::prelude::*;
use futures::StreamExt;
use tracing::{error, info};

use crate::app::state::CONFIG;

enum Step {
    Command(Option<UiCommand>),
    Event(bazaar::BoardEvent),
}

/// Drive the board: commands from the components, events from the backend.
/// After every step the state snapshot is published to `snapshot`.
async fn run_board(mut commands: UnboundedReceiver<UiCommand>, mut snapshot: Signal<BoardState>) {
    let Some(config) = CONFIG.get() else {
        error!("Configuration was not set before launching the UI");
        return;
    };
    let auth = FirebaseAuth::new(config.provider.clone());
    let store = FirestoreStore::new(auth.clone(), config.poll_interval);
    let mut board = Board::new(auth, store, config);

    board.start().await;
    board.process_pending();
    snapshot.set(board.state().clone());

    loop {
        let step = tokio::select! {
            command = commands.next() => Step::Command(command),
            event = board.next_event() => Step::Event(event),
        };
        match step {
            Step::Command(Some(UiCommand::Submit)) if board.accepts_submit() => {
                // Show the in-flight state while the append runs
                let mut pending = board.state().clone();
                pending.submitting = true;
                snapshot.set(pending);
                board.dispatch(UiCommand::Submit).await;
            }
            Step::Command(Some(command)) => board.dispatch(command).await,
            Step::Command(None) => break,
            Step::Event(event) => board.handle_event(event),
        }
        board.process_pending();
        snapshot.set(board.state().clone());
    }

    info!("Command channel closed, releasing backend resources");
    board.shutdown();
}

/// Top navigation between the three views.
#[component]
pub fn NavBar(current: View) -> Element {
    let commands = use_coroutine_handle::<UiCommand>();
    let entries = [
        (View::Home, "Home"),
        (View::Register, "Offer a service"),
        (View::Services, "Browse services"),
    ];

    rsx! {
        nav {
            class: "navbar",
            for (view, label) in entries {
                button {
                    key: "{label}",
                    class: if view == current { "nav-btn active" } else { "nav-btn" },
                    onclick: move |_| commands.send(UiCommand::Navigate(view)),
                    "{label}"
                }
            }
        }
    }
}

/// Landing view.
#[component]
pub fn HomeView(ready: bool, user_id: Option<String>, listing_count: usize) -> Element {
    let commands = use_coroutine_handle::<UiCommand>();
    let status = match (&user_id, ready) {
        (Some(id), _) => format!("Signed in as {id}"),
        (None, true) => "Not signed in".to_string(),
        (None, false) => "Connecting...".to_string(),
    };

    rsx! {
        div {
            class: "card home",
            h2 { "Welcome to the community services board" }
            p { "Find people nearby who offer the help you need, or let your neighbours know what you can do." }
            p { class: "muted", "{status}" }
            p { "{listing_count} services listed" }
            div {
                class: "actions",
                button {
                    onclick: move |_| commands.send(UiCommand::Navigate(View::Register)),
                    "Offer a service"
                }
                button {
                    onclick: move |_| commands.send(UiCommand::Navigate(View::Services)),
                    "Browse services"
                }
            }
        }
    }
}

/// One labelled input of the registration form.
#[component]
fn FormInput(field: FormField, value: String) -> Element {
    let commands = use_coroutine_handle::<UiCommand>();
    let label = field.label();

    rsx! {
        label {
            class: "field",
            span { "{label}" }
            if field == FormField::Description {
                textarea {
                    value: "{value}",
                    rows: "4",
                    oninput: move |e| commands.send(UiCommand::EditField(field, e.value())),
                }
            } else {
                input {
                    r#type: "text",
                    value: "{value}",
                    oninput: move |e| commands.send(UiCommand::EditField(field, e.value())),
                }
            }
        }
    }
}

/// Service registration form.
#[component]
pub fn RegisterForm(form: ListingForm, submitting: bool, can_submit: bool) -> Element {
    let commands = use_coroutine_handle::<UiCommand>();
    let inputs: Vec<(FormField, &'static str, String)> = FormField::ALL
        .into_iter()
        .map(|field| (field, field.key(), form.get(field).to_string()))
        .collect();

    rsx! {
        div {
            class: "card register",
            h2 { "Offer a service" }
            for (field, key, value) in inputs {
                FormInput { key: "{key}", field, value }
            }
            button {
                class: "submit-btn",
                disabled: !can_submit,
                onclick: move |_| commands.send(UiCommand::Submit),
                if submitting { "Registering..." } else { "Register service" }
            }
        }
    }
}

#[component]
fn ListingCard(listing: Listing) -> Element {
    let listed_on = listing.listed_on();

    rsx! {
        div {
            class: "listing-card",
            h3 { "{listing.name}" }
            span { class: "tag", "{listing.service_type}" }
            p { "{listing.description}" }
            div {
                class: "listing-grid",
                span { class: "label", "Location:" }
                span { "{listing.location}" }
                span { class: "label", "Contact:" }
                span { "{listing.contact}" }
                if let Some(date) = listed_on {
                    span { class: "label", "Listed:" }
                    span { "{date}" }
                }
            }
        }
    }
}

/// Browse view: filters on top, matching listings or a placeholder below.
#[component]
pub fn ServicesBrowser(
    filter: ListingFilter,
    categories: Vec<String>,
    locations: Vec<String>,
    listings: Vec<Listing>,
    placeholder: Option<&'static str>,
) -> Element {
    let commands = use_coroutine_handle::<UiCommand>();

    rsx! {
        div {
            class: "card services",
            h2 { "Services" }
            div {
                class: "filters",
                input {
                    r#type: "search",
                    placeholder: "Search by name, type or description",
                    value: "{filter.search}",
                    oninput: move |e| commands.send(UiCommand::SetSearch(e.value())),
                }
                select {
                    value: "{filter.category}",
                    onchange: move |e| commands.send(UiCommand::SetCategory(e.value())),
                    option { value: "", "All categories" }
                    for category in categories {
                        option { key: "{category}", value: "{category}", "{category}" }
                    }
                }
                select {
                    value: "{filter.location}",
                    onchange: move |e| commands.send(UiCommand::SetLocation(e.value())),
                    option { value: "", "All locations" }
                    for location in locations {
                        option { key: "{location}", value: "{location}", "{location}" }
                    }
                }
                if !filter.is_empty() {
                    button {
                        class: "clear-btn",
                        onclick: move |_| commands.send(UiCommand::ClearFilters),
                        "Clear"
                    }
                }
            }
            if let Some(message) = placeholder {
                p { class: "placeholder", "{message}" }
            } else {
                div {
                    class: "listing-list",
                    for listing in listings {
                        ListingCard { key: "{listing.id}", listing }
                    }
                }
            }
        }
    }
}

/// The pending notification, if any.
#[component]
pub fn NotificationOverlay(notification: Option<Notification>) -> Element {
    let commands = use_coroutine_handle::<UiCommand>();
    let Some(notification) = notification else {
        return rsx! {};
    };
    let class = format!("notification {}", notification.kind.as_str());

    rsx! {
        div {
            class: "{class}",
            span { "{notification.text}" }
            button {
                class: "dismiss-btn",
                onclick: move |_| commands.send(UiCommand::DismissNotification),
                "×"
            }
        }
    }
}

/// Main application component.
pub fn app() -> Element {
    let snapshot = use_signal(BoardState::default);
    use_coroutine(move |rx: UnboundedReceiver<UiCommand>| run_board(rx, snapshot));

    let state = snapshot.read();
    let body = match state.view {
        View::Home => {
            let model = home_model(&state);
            rsx! {
                HomeView {
                    ready: model.ready,
                    user_id: model.user_id.map(ToString::to_string),
                    listing_count: model.listing_count,
                }
            }
        }
        View::Register => {
            let model = register_model(&state);
            rsx! {
                RegisterForm {
                    form: model.form.clone(),
                    submitting: model.submitting,
                    can_submit: model.can_submit,
                }
            }
        }
        View::Services => {
            let model = services_model(&state);
            let placeholder = model.body.placeholder();
            let listings: Vec<Listing> = match &model.body {
                bazaar::BrowseBody::Listings(shown) => shown.iter().map(|l| (*l).clone()).collect(),
                _ => Vec::new(),
            };
            rsx! {
                ServicesBrowser {
                    filter: model.filter.clone(),
                    categories: model.categories,
                    locations: model.locations,
                    listings,
                    placeholder,
                }
            }
        }
    };

    rsx! {
        document::Stylesheet { href: asset!("/assets/styles.css") }

        div {
            class: "container",
            h1 { "Community Services" }
            NavBar { current: state.view }
            {body}
            NotificationOverlay { notification: state.notification.current().cloned() }
        }
    }
}
