mod config;
mod quiz;
mod reveal;
mod screens;
mod share;

use std::sync::Arc;

use config::Config;
use dotenv::dotenv;
use quiz::{Category, CategoryId, Content, Session};
use reveal::{RevealTasks, ThinkingPhrases};
use screens::{AGAIN_BUTTON, SHARE_BUTTON, START_BUTTON};
use share::ShareMethod;
use teloxide::{
    dispatching::dialogue::InMemStorage,
    prelude::*,
    types::{InputFile, KeyboardButton, KeyboardMarkup, KeyboardRemove, ParseMode},
    utils::command::BotCommands,
    RequestError,
};

type QuizDialogue = Dialogue<Session, InMemStorage<Session>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;
type Reveals = RevealTasks<ChatId>;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Команды Распределяющей Шляпы:")]
enum Command {
    #[command(description = "начать распределение")]
    Start,
    #[command(description = "сбросить ответы и начать заново")]
    Restart,
    #[command(description = "показать список команд")]
    Help,
}

#[tokio::main]
async fn main() {
    let dotenv_loaded = dotenv().is_ok();
    pretty_env_logger::init();
    if !dotenv_loaded {
        log::info!("No .env file found, reading configuration from the environment");
    }

    let config = match Config::from_env() {
        Ok(config) => Arc::new(config),
        Err(err) => {
            log::error!("Invalid configuration: {}", err);
            std::process::exit(1);
        }
    };

    // Malformed content must never reach a player, refuse to start instead
    let content = match Content::load(config.content_path.as_deref()) {
        Ok(content) => Arc::new(content),
        Err(err) => {
            log::error!("Invalid quiz content: {}", err);
            std::process::exit(1);
        }
    };
    log::info!(
        "Loaded {} questions and {} houses",
        content.question_count(),
        content.categories().len()
    );

    log::info!("Starting sorting hat bot...");
    let bot = Bot::from_env();

    if let Err(err) = bot.set_my_commands(Command::bot_commands()).await {
        log::warn!("Failed to register bot commands: {}", err);
    }

    Dispatcher::builder(
        bot,
        Update::filter_message()
            .enter_dialogue::<Message, InMemStorage<Session>, Session>()
            .branch(teloxide::filter_command::<Command, _>().endpoint(handle_command))
            .branch(dptree::case![Session::NotStarted].endpoint(intro))
            .branch(dptree::case![Session::InProgress { progress, scores }].endpoint(receive_answer))
            .branch(
                dptree::case![Session::Resolved {
                    winner,
                    scores,
                    answers
                }]
                .endpoint(result_actions),
            ),
    )
    .dependencies(dptree::deps![
        InMemStorage::<Session>::new(),
        content,
        config,
        Reveals::new()
    ])
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;
}

async fn handle_command(
    bot: Bot,
    dialogue: QuizDialogue,
    msg: Message,
    cmd: Command,
    session: Session,
    reveals: Reveals,
) -> HandlerResult {
    match cmd {
        Command::Start | Command::Restart => {
            if reveals.cancel(&msg.chat.id).await {
                log::debug!("Cancelled pending reveal for chat {}", msg.chat.id);
            }
            dialogue.update(session.restart()).await?;
            send_intro(&bot, msg.chat.id).await?;
        }
        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string())
                .await?;
        }
    }
    Ok(())
}

async fn intro(
    bot: Bot,
    dialogue: QuizDialogue,
    msg: Message,
    session: Session,
    content: Arc<Content>,
) -> HandlerResult {
    if msg.text() != Some(START_BUTTON) {
        bot.send_message(msg.chat.id, screens::PRESS_START)
            .reply_markup(start_keyboard())
            .await?;
        return Ok(());
    }

    let session = session.start(&content)?;
    dialogue.update(session.clone()).await?;
    send_question(&bot, msg.chat.id, &session, &content).await?;
    Ok(())
}

async fn receive_answer(
    bot: Bot,
    dialogue: QuizDialogue,
    msg: Message,
    session: Session,
    content: Arc<Content>,
    config: Arc<Config>,
    reveals: Reveals,
) -> HandlerResult {
    let question = session
        .current_question(&content)
        .ok_or("session is in progress but has no current question")?;

    // Anything that is not one of the buttons is ignored, never scored
    let index = match msg.text().and_then(|text| question.answer_index(text)) {
        Some(index) => index,
        None => {
            bot.send_message(msg.chat.id, screens::PICK_AN_ANSWER).await?;
            return Ok(());
        }
    };

    let next = session.answer(&content, index, &mut rand::thread_rng())?;
    // Store the new state before replying so a repeated tap is scored against it
    dialogue.update(next.clone()).await?;

    match next.winner() {
        Some(winner) => {
            log::info!(
                "Chat {} sorted into {} with scores {:?} after answers {:?}",
                msg.chat.id,
                winner,
                next.scores(),
                next.answers()
            );
            start_reveal(bot, msg.chat.id, winner, &content, &config, &reveals).await
        }
        None => send_question(&bot, msg.chat.id, &next, &content).await,
    }
}

async fn result_actions(
    bot: Bot,
    dialogue: QuizDialogue,
    msg: Message,
    session: Session,
    content: Arc<Content>,
    config: Arc<Config>,
    reveals: Reveals,
) -> HandlerResult {
    let chat_id = msg.chat.id;

    if msg.text() == Some(AGAIN_BUTTON) {
        reveals.cancel(&chat_id).await;
        dialogue.update(session.restart()).await?;
        send_intro(&bot, chat_id).await?;
        return Ok(());
    }

    if reveals.is_pending(&chat_id).await {
        bot.send_message(chat_id, screens::HAT_IS_THINKING).await?;
        return Ok(());
    }

    let category = session
        .winner()
        .and_then(|winner| content.category(winner))
        .ok_or("resolved session without a known winner")?;

    if msg.text() != Some(SHARE_BUTTON) {
        send_result(&bot, chat_id, category).await?;
        return Ok(());
    }

    let share_url = config.share_url.as_deref();
    let chain = share::available_methods(category, share_url);
    let bot_ref = &bot;

    let shared = share::share_with_fallback(&chain, move |method| {
        share_via(bot_ref, chat_id, category, method, share_url)
    })
    .await;
    if shared.is_none() {
        bot.send_message(chat_id, share::SHARE_FAILED_NOTICE).await?;
    }
    Ok(())
}

async fn send_intro(bot: &Bot, chat_id: ChatId) -> Result<(), RequestError> {
    bot.send_message(chat_id, screens::INTRO_TEXT)
        .parse_mode(ParseMode::Html)
        .reply_markup(start_keyboard())
        .await?;
    Ok(())
}

fn start_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![KeyboardButton::new(START_BUTTON)]])
}

async fn send_question(
    bot: &Bot,
    chat_id: ChatId,
    session: &Session,
    content: &Content,
) -> HandlerResult {
    let (question, view) = session
        .current_question(content)
        .zip(session.progress(content))
        .ok_or("no question to show")?;

    let keyboard = KeyboardMarkup::new(
        question
            .answers
            .iter()
            .map(|a| vec![KeyboardButton::new(a.text.clone())])
            .collect::<Vec<_>>(),
    );

    bot.send_message(chat_id, screens::question_text(question, view))
        .parse_mode(ParseMode::Html)
        .reply_markup(keyboard)
        .await?;
    Ok(())
}

/// Shows the hat "thinking" and schedules the reveal of `winner`. The reveal
/// runs in its own task so `/restart` can abort it.
async fn start_reveal(
    bot: Bot,
    chat_id: ChatId,
    winner: CategoryId,
    content: &Content,
    config: &Config,
    reveals: &Reveals,
) -> HandlerResult {
    let category = content
        .category(winner)
        .cloned()
        .ok_or("winner is missing from the catalog")?;
    let thinking = ThinkingPhrases::new(
        content.thinking_phrases().to_vec(),
        &mut rand::thread_rng(),
    );

    let message = bot
        .send_message(chat_id, thinking.at(0))
        .reply_markup(KeyboardRemove::new())
        .await?;

    let phrase_change = config.phrase_change;
    let reveal_delay = config.reveal_delay;
    let task = tokio::spawn(async move {
        let ticks = reveal::ticks_before_reveal(phrase_change, reveal_delay);
        for tick in 1..=ticks {
            tokio::time::sleep(phrase_change).await;
            if let Err(err) = bot
                .edit_message_text(chat_id, message.id, thinking.at(tick))
                .await
            {
                log::warn!("Failed to update thinking phrase: {}", err);
            }
        }
        let rest = reveal_delay.saturating_sub(phrase_change * ticks as u32);
        tokio::time::sleep(rest).await;

        if let Err(err) = send_result(&bot, chat_id, &category).await {
            log::error!("Failed to reveal result in chat {}: {}", chat_id, err);
        }
    });

    reveals.schedule(chat_id, task).await;
    Ok(())
}

async fn send_result(bot: &Bot, chat_id: ChatId, category: &Category) -> Result<(), RequestError> {
    let keyboard = KeyboardMarkup::new(vec![
        vec![KeyboardButton::new(SHARE_BUTTON)],
        vec![KeyboardButton::new(AGAIN_BUTTON)],
    ]);

    bot.send_message(chat_id, screens::result_text(category))
        .parse_mode(ParseMode::Html)
        .reply_markup(keyboard)
        .await?;
    Ok(())
}

async fn share_via(
    bot: &Bot,
    chat_id: ChatId,
    category: &Category,
    method: ShareMethod,
    share_url: Option<&str>,
) -> Result<(), RequestError> {
    match (method, share_url) {
        (ShareMethod::Photo, _) => {
            bot.send_photo(chat_id, InputFile::file(&category.image))
                .caption(share::share_text(category))
                .await?;
        }
        (ShareMethod::TextWithLink, Some(url)) => {
            bot.send_message(chat_id, share::share_text_with_link(category, url))
                .await?;
        }
        (ShareMethod::TextWithLink, None) | (ShareMethod::PlainText, _) => {
            bot.send_message(chat_id, share::share_text(category)).await?;
        }
    }
    Ok(())
}
