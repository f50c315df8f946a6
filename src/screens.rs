use teloxide::utils::html;

use crate::quiz::{Category, ProgressView, Question};

pub const START_BUTTON: &str = "Начать распределение";
pub const SHARE_BUTTON: &str = "Поделиться результатом";
pub const AGAIN_BUTTON: &str = "Ещё раз";

pub const INTRO_TEXT: &str = "<b>Дорогой волшебник, этот час настал!</b>

Знаменитая Распределяющая Шляпа готова объявить, какой именно факультет Хогвартса станет твоим домом.

Кто же ты — отважный гриффиндорец, доблестный пуффендуец, проницательный когтевранец, упорный слизеринец или новатор-промтевринец?

Выбирай один вариант ответа, который наиболее точно отражает твои предпочтения и качества.";

pub const PICK_AN_ANSWER: &str = "Выбери один из вариантов на клавиатуре";
pub const PRESS_START: &str = "Нажми «Начать распределение», когда будешь готов";
pub const HAT_IS_THINKING: &str = "Шляпа ещё думает, подожди немного...";

const PROGRESS_BAR_WIDTH: u32 = 10;

pub fn progress_bar(view: ProgressView) -> String {
    let filled = (view.percent() * PROGRESS_BAR_WIDTH + 50) / 100;
    let filled = filled.min(PROGRESS_BAR_WIDTH) as usize;
    format!(
        "{}{}",
        "▰".repeat(filled),
        "▱".repeat(PROGRESS_BAR_WIDTH as usize - filled)
    )
}

pub fn question_text(question: &Question, view: ProgressView) -> String {
    format!(
        "{} {}/{}\n\n{}",
        progress_bar(view),
        view.index + 1,
        view.total,
        html::bold(&html::escape(&question.text))
    )
}

pub fn result_text(category: &Category) -> String {
    let [first, second] = category.skills();
    format!(
        "{} {}\n\n• {}\n• {}",
        category.emoji,
        html::bold(&html::escape(&category.name)),
        html::escape(&first),
        html::escape(&second)
    )
}
