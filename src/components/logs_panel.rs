use chrono::Local;
use gloo_timers::callback::Timeout;
use web_sys::{Element, HtmlInputElement, HtmlSelectElement};
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api::fetch_action_logs;
use crate::config::DashboardConfig;
use crate::logs::display::{
    actor_label, is_success, method_status_label, pretty_json, row_key, timestamp_label,
};
use crate::logs::{
    filter_logs, BrowserIntervals, DisplayedLog, FetchRequest, FilterOptions, LogAction,
    LogViewState, PollScheduler, PollState, HIGHLIGHT_DURATION, POLL_INTERVAL,
};
use crate::types::FilterCriteria;

const CONTROL_STYLE: &str = "padding:0.5em; border:1px solid #ccc; border-radius:4px; min-width:140px;";

#[function_component(LogsPanel)]
pub fn logs_panel() -> Html {
    let config = use_context::<DashboardConfig>().unwrap_or_default();
    let view = use_reducer(LogViewState::default);
    let criteria = use_state(FilterCriteria::default);
    let list_ref = use_node_ref();
    let rerender = use_force_update();

    let scheduler = {
        let dispatcher = view.dispatcher();
        use_mut_ref(move || {
            PollScheduler::new(BrowserIntervals, POLL_INTERVAL, move |request: FetchRequest| {
                let dispatcher = dispatcher.clone();
                let config = config.clone();
                spawn_local(async move {
                    let outcome = fetch_action_logs(&config, &request.criteria).await;
                    dispatcher.dispatch(LogAction::Fetched {
                        seq: request.seq,
                        outcome,
                    });
                });
            })
        })
    };

    // Restart the timer whenever the criteria change (and on mount)
    {
        let scheduler = scheduler.clone();
        use_effect_with((*criteria).clone(), move |criteria| {
            scheduler.borrow_mut().set_criteria(criteria.clone());
            || ()
        });
    }

    // No timer may outlive the panel
    {
        let scheduler = scheduler.clone();
        use_effect_with((), move |_| move || scheduler.borrow_mut().teardown());
    }

    {
        let dispatcher = view.dispatcher();
        use_effect_with(view.highlight_generation, move |generation| {
            let millis = HIGHLIGHT_DURATION.as_millis() as u32;
            let timeout = (*generation > 0).then(|| {
                Timeout::new(millis, move || dispatcher.dispatch(LogAction::HighlightElapsed))
            });
            move || drop(timeout)
        });
    }

    let options = FilterOptions::from_logs(view.entries());
    let filtered = filter_logs(&view.logs, &criteria, &Local);
    let poll_state = scheduler.borrow().state();

    // Back to the newest entry whenever what is shown changes
    {
        let list_ref = list_ref.clone();
        let shown: Vec<String> = filtered
            .iter()
            .enumerate()
            .map(|(position, log)| row_key(&log.entry, position))
            .collect();
        use_effect_with(shown, move |_| {
            if let Some(list) = list_ref.cast::<Element>() {
                list.set_scroll_top(0);
            }
            || ()
        });
    }

    let on_actor_change = {
        let criteria = criteria.clone();
        Callback::from(move |event: Event| {
            let target = event.target_unchecked_into::<HtmlSelectElement>();
            criteria.set(FilterCriteria {
                actor: target.value(),
                ..(*criteria).clone()
            });
        })
    };

    let on_endpoint_change = {
        let criteria = criteria.clone();
        Callback::from(move |event: Event| {
            let target = event.target_unchecked_into::<HtmlSelectElement>();
            criteria.set(FilterCriteria {
                endpoint: target.value(),
                ..(*criteria).clone()
            });
        })
    };

    let on_start_change = {
        let criteria = criteria.clone();
        Callback::from(move |event: Event| {
            let target = event.target_unchecked_into::<HtmlInputElement>();
            criteria.set(FilterCriteria {
                start_time: target.value(),
                ..(*criteria).clone()
            });
        })
    };

    let on_end_change = {
        let criteria = criteria.clone();
        Callback::from(move |event: Event| {
            let target = event.target_unchecked_into::<HtmlInputElement>();
            criteria.set(FilterCriteria {
                end_time: target.value(),
                ..(*criteria).clone()
            });
        })
    };

    let on_run_query = {
        let scheduler = scheduler.clone();
        let rerender = rerender.clone();
        Callback::from(move |_: MouseEvent| {
            scheduler.borrow_mut().run_query();
            rerender.force_update();
        })
    };

    let on_clear_query = {
        let scheduler = scheduler.clone();
        let dispatcher = view.dispatcher();
        Callback::from(move |_: MouseEvent| {
            let fence = scheduler.borrow_mut().clear_query();
            dispatcher.dispatch(LogAction::Cleared { fence });
        })
    };

    let on_refresh = {
        let scheduler = scheduler.clone();
        Callback::from(move |_: MouseEvent| {
            scheduler.borrow_mut().refresh();
        })
    };

    html! {
        <div style="border:1px solid #ddd; border-radius:8px; background:white; padding:1em; display:flex; flex-direction:column; gap:1em;">
            <div style="display:flex; flex-wrap:wrap; gap:0.75em; align-items:flex-end;">
                { filter_select("Actor", &criteria.actor, &options.actors, on_actor_change) }
                { filter_select("Endpoint", &criteria.endpoint, &options.endpoints, on_endpoint_change) }
                <label style="display:flex; flex-direction:column; gap:0.25em; color:#555; font-size:0.85em;">
                    { "Start Time" }
                    <input type="datetime-local" value={criteria.start_time.clone()} onchange={on_start_change} style={CONTROL_STYLE} />
                </label>
                <label style="display:flex; flex-direction:column; gap:0.25em; color:#555; font-size:0.85em;">
                    { "End Time" }
                    <input type="datetime-local" value={criteria.end_time.clone()} onchange={on_end_change} style={CONTROL_STYLE} />
                </label>
                <button onclick={on_run_query} style="padding:0.6em 1em; background:#007bff; color:white; border:none; border-radius:4px; cursor:pointer;">
                    { "Run Query" }
                </button>
                <button onclick={on_clear_query} style="padding:0.6em 1em; background:white; color:#fd7e14; border:1px solid #fd7e14; border-radius:4px; cursor:pointer;">
                    { "Clear Query" }
                </button>
                { if poll_state == PollState::Active {
                    html! {
                        <button onclick={on_refresh} style="padding:0.6em 1em; background:white; color:#007bff; border:1px solid #007bff; border-radius:4px; cursor:pointer;">
                            { "Refresh" }
                        </button>
                    }
                } else {
                    html! {}
                }}
            </div>

            { match (&view.last_failure, poll_state) {
                (Some(err), _) => html! {
                    <div style="padding:0.5em 1em; background:#f8d7da; border:1px solid #f5c6cb; border-radius:4px; color:#721c24; font-size:0.9em;">
                        { format!("Log service unreachable: {}", err) }
                    </div>
                },
                (None, PollState::Paused) => html! {
                    <div style="color:#888; font-size:0.9em;">{ "Polling paused. Run the query to resume." }</div>
                },
                (None, PollState::Active) => html! {},
            }}

            <ul ref={list_ref} style="list-style:none; margin:0; padding:0; height:50vh; overflow-y:auto;">
                { for filtered.iter().enumerate().map(|(position, log)| log_row(log, position)) }
            </ul>
        </div>
    }
}

fn filter_select(label: &str, current: &str, values: &[String], onchange: Callback<Event>) -> Html {
    html! {
        <label style="display:flex; flex-direction:column; gap:0.25em; color:#555; font-size:0.85em;">
            { label }
            <select {onchange} style={CONTROL_STYLE}>
                <option value="" selected={current.is_empty()}>{ "All" }</option>
                { for values.iter().map(|value| html! {
                    <option key={value.clone()} value={value.clone()} selected={value == current}>{ value }</option>
                })}
            </select>
        </label>
    }
}

fn log_row(log: &DisplayedLog, position: usize) -> Html {
    let entry = &log.entry;
    let status_color = if is_success(entry) { "#198754" } else { "#dc3545" };
    let background = if log.is_new { "#fff3cd" } else { "transparent" };

    html! {
        <li
            key={row_key(entry, position)}
            class={classes!("log-item", log.is_new.then_some("new-log"))}
            style={format!("border-bottom:1px solid #eee; padding:0.25em 0.5em; background:{}; transition:background 1.5s;", background)}
        >
            <details>
                <summary style="display:flex; align-items:center; gap:0.5em; cursor:pointer; font-size:0.9em;">
                    <span style="color:#555;">{ format!("[{}]", timestamp_label(entry, &Local)) }</span>
                    <span style="background:#4a5568; color:white; padding:0.1em 0.6em; border-radius:12px; font-size:0.8em;">
                        { actor_label(entry) }
                    </span>
                    <span style={format!("background:{}; color:white; padding:0.1em 0.6em; border-radius:12px; font-size:0.8em;", status_color)}>
                        { method_status_label(entry) }
                    </span>
                    <span>{ entry.endpoint.clone().unwrap_or_default() }</span>
                </summary>
                { json_section("Payload", &entry.payload) }
                { json_section("Response", &entry.response) }
            </details>
        </li>
    }
}

fn json_section(title: &str, value: &serde_json::Value) -> Html {
    html! {
        <details style="margin:0.5em 0 0.5em 1em;">
            <summary style="cursor:pointer; color:#495057;">{ title }</summary>
            <pre style="margin:0.5em 0; padding:0.5em; background:#f8f9fa; border-radius:4px; font-family:'Courier New', monospace; font-size:0.85em; overflow-x:auto;">
                { pretty_json(value) }
            </pre>
        </details>
    }
}
