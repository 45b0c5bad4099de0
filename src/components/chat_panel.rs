use chrono::Local;
use web_sys::{Element, HtmlInputElement};
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api::{fetch_chat_history, send_chat};
use crate::chat::{flatten_history, send_message, ChatAction, ChatState};
use crate::config::DashboardConfig;
use crate::types::Sender;

#[function_component(ChatPanel)]
pub fn chat_panel() -> Html {
    let config = use_context::<DashboardConfig>().unwrap_or_default();
    let chat = use_reducer(ChatState::default);
    let input = use_state(String::new);
    let messages_ref = use_node_ref();

    // Load earlier turns on mount
    {
        let dispatcher = chat.dispatcher();
        let config = config.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match fetch_chat_history(&config).await {
                    Ok(records) => dispatcher
                        .dispatch(ChatAction::HistoryLoaded(flatten_history(records, &Local))),
                    Err(err) => log::warn!("could not load chat history: {}", err),
                }
            });
            || ()
        });
    }

    // Keep the newest message in view
    {
        let messages_ref = messages_ref.clone();
        use_effect_with((chat.messages.len(), chat.loading), move |_| {
            if let Some(container) = messages_ref.cast::<Element>() {
                container.set_scroll_top(container.scroll_height());
            }
            || ()
        });
    }

    let submit = {
        let chat = chat.clone();
        let input = input.clone();
        Callback::from(move |_: ()| {
            if chat.loading {
                return;
            }
            let dispatcher = chat.dispatcher();
            let config = config.clone();
            let sending = send_message(
                &input,
                move |action| dispatcher.dispatch(action),
                move |text| async move { send_chat(&config, text).await },
            );
            if let Some(reply) = sending {
                input.set(String::new());
                spawn_local(reply);
            }
        })
    };

    let on_input = {
        let input = input.clone();
        Callback::from(move |event: InputEvent| {
            let target = event.target_unchecked_into::<HtmlInputElement>();
            input.set(target.value());
        })
    };

    let on_keydown = {
        let submit = submit.clone();
        Callback::from(move |event: KeyboardEvent| {
            if event.key() == "Enter" {
                event.prevent_default();
                submit.emit(());
            }
        })
    };

    let on_send_click = {
        let submit = submit.clone();
        Callback::from(move |_: MouseEvent| submit.emit(()))
    };

    html! {
        <div style="display:flex; flex-direction:column; height:calc(100vh - 6em); border:1px solid #ddd; border-radius:8px; background:white; padding:1em; box-sizing:border-box;">
            <div ref={messages_ref} style="flex:1; overflow-y:auto; display:flex; flex-direction:column; gap:0.5em; padding:1em; background:#f8f9fa; border-radius:4px;">
                { for chat.messages.iter().enumerate().map(|(index, message)| {
                    let is_user = message.sender == Sender::User;
                    let key = message.id.clone().unwrap_or_else(|| format!("live-{}", index));
                    html! {
                        <div key={key} style={format!(
                            "align-self:{}; max-width:75%; padding:0.5em 1em; border-radius:8px; background:{}; color:black; white-space:pre-wrap;",
                            if is_user { "flex-end" } else { "flex-start" },
                            if is_user { "#91e5ff" } else { "#f1f1f1" }
                        )}>
                            { &message.text }
                        </div>
                    }
                })}
            </div>
            { if chat.loading {
                html! {
                    <div style="margin:0.5em 0; height:6px; background:#e7f3ff; border-radius:3px; overflow:hidden;">
                        <div style="width:40%; height:100%; background:#007bff; animation:progress 1s linear infinite;"></div>
                    </div>
                }
            } else {
                html! {}
            }}
            <div style="display:flex; gap:0.5em; margin-top:0.5em;">
                <input
                    type="text"
                    placeholder="Type a message..."
                    value={(*input).clone()}
                    oninput={on_input}
                    onkeydown={on_keydown}
                    style="flex:1; padding:0.5em; border:1px solid #ccc; border-radius:4px;"
                />
                <button
                    onclick={on_send_click}
                    disabled={chat.loading}
                    style="padding:0.5em 1em; background:#007bff; color:white; border:none; border-radius:4px; cursor:pointer;"
                >
                    { "Send" }
                </button>
            </div>
        </div>
    }
}
