// SPDX-License-Identifier: GPL-3.0-only

use cardbox::core::models::{Flashcard, StarredFlashcard, StudySet};

mod common;

#[tokio::test]
async fn study_sets_come_back_newest_first_with_counts() {
    let client = common::client().await;
    let (_auth, user) = common::sign_in(&client).await;

    let first = StudySet::add(&client, &user.id, "Hiragana", None)
        .await
        .unwrap();
    Flashcard::add(&client, first.id.unwrap(), "あ", "a")
        .await
        .unwrap();
    Flashcard::add(&client, first.id.unwrap(), "い", "i")
        .await
        .unwrap();
    Flashcard::add(&client, first.id.unwrap(), "う", "u")
        .await
        .unwrap();

    let second = StudySet::add(&client, &user.id, "Katakana", Some("Kana practice"))
        .await
        .unwrap();

    let sets = StudySet::get_all(&client, &user.id).await.unwrap();
    assert_eq!(sets.len(), 2);
    assert_eq!(sets[0].id, second.id, "newest-updated set comes first");
    assert_eq!(sets[1].card_count, 3);
    assert_eq!(sets[0].card_count, 0);

    let fetched = StudySet::get(&client, first.id.unwrap()).await.unwrap();
    assert_eq!(fetched.unwrap().card_count, 3);
}

#[tokio::test]
async fn sets_are_scoped_to_their_owner() {
    let client = common::client().await;
    let (auth, user) = common::sign_in(&client).await;
    StudySet::add(&client, &user.id, "Mine", None).await.unwrap();

    let other = auth.sign_in(&client, "other@example.com").await.unwrap();
    let sets = StudySet::get_all(&client, &other.id).await.unwrap();
    assert!(sets.is_empty());
}

#[tokio::test]
async fn missing_set_is_none_not_an_error() {
    let client = common::client().await;

    let fetched = StudySet::get(&client, 9999).await.unwrap();
    assert!(fetched.is_none());
}

#[tokio::test]
async fn blank_titles_are_rejected() {
    let client = common::client().await;
    let (_auth, user) = common::sign_in(&client).await;

    assert!(StudySet::add(&client, &user.id, "   ", None).await.is_err());

    let mut set = StudySet::add(&client, &user.id, "Verbs", None)
        .await
        .unwrap();
    set.title = String::from("");
    assert!(StudySet::edit(&client, &set).await.is_err());
}

#[tokio::test]
async fn flashcards_keep_their_position_order() {
    let client = common::client().await;
    let (_auth, user) = common::sign_in(&client).await;
    let set = StudySet::add(&client, &user.id, "Numbers", None)
        .await
        .unwrap();
    let set_id = set.id.unwrap();

    Flashcard::add(&client, set_id, "一", "one").await.unwrap();
    Flashcard::add(&client, set_id, "二", "two").await.unwrap();
    Flashcard::add(&client, set_id, "三", "three").await.unwrap();

    let cards = Flashcard::get_all(&client, set_id, None).await.unwrap();
    assert_eq!(cards.len(), 3);
    assert_eq!(
        cards.iter().map(|c| c.position).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
    assert_eq!(
        cards.iter().map(|c| c.term.as_str()).collect::<Vec<_>>(),
        vec!["一", "二", "三"]
    );
    // Without a viewer star state is undefined
    assert!(cards.iter().all(|c| c.is_starred.is_none()));
}

#[tokio::test]
async fn bulk_added_cards_continue_the_positions() {
    let client = common::client().await;
    let (_auth, user) = common::sign_in(&client).await;
    let set = StudySet::add(&client, &user.id, "Colors", None)
        .await
        .unwrap();
    let set_id = set.id.unwrap();

    Flashcard::add(&client, set_id, "赤", "red").await.unwrap();
    Flashcard::add_bulk(
        &client,
        set_id,
        vec![
            (String::from("青"), String::from("blue")),
            (String::from("白"), String::from("white")),
        ],
    )
    .await
    .unwrap();

    let cards = Flashcard::get_all(&client, set_id, None).await.unwrap();
    assert_eq!(
        cards.iter().map(|c| c.position).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );

    let appended = Flashcard::add(&client, set_id, "黒", "black").await.unwrap();
    assert_eq!(appended.position, 3);
}

#[tokio::test]
async fn star_toggle_is_its_own_inverse() {
    let client = common::client().await;
    let (_auth, user) = common::sign_in(&client).await;
    let set = StudySet::add(&client, &user.id, "Verbs", None)
        .await
        .unwrap();
    let card = Flashcard::add(&client, set.id.unwrap(), "食べる", "to eat")
        .await
        .unwrap();
    let card_id = card.id.unwrap();

    assert!(StarredFlashcard::toggle(&client, &user.id, card_id)
        .await
        .unwrap());
    assert!(StarredFlashcard::is_starred(&client, &user.id, card_id)
        .await
        .unwrap());

    let cards = Flashcard::get_all(&client, set.id.unwrap(), Some(&user.id))
        .await
        .unwrap();
    assert_eq!(cards[0].is_starred, Some(true));

    assert!(!StarredFlashcard::toggle(&client, &user.id, card_id)
        .await
        .unwrap());
    let cards = Flashcard::get_all(&client, set.id.unwrap(), Some(&user.id))
        .await
        .unwrap();
    assert_eq!(cards[0].is_starred, Some(false));
}

#[tokio::test]
async fn stars_are_per_user() {
    let client = common::client().await;
    let (auth, user) = common::sign_in(&client).await;
    let set = StudySet::add(&client, &user.id, "Verbs", None)
        .await
        .unwrap();
    let card = Flashcard::add(&client, set.id.unwrap(), "見る", "to see")
        .await
        .unwrap();

    StarredFlashcard::toggle(&client, &user.id, card.id.unwrap())
        .await
        .unwrap();

    let other = auth.sign_in(&client, "other@example.com").await.unwrap();
    let cards = Flashcard::get_all(&client, set.id.unwrap(), Some(&other.id))
        .await
        .unwrap();
    assert_eq!(cards[0].is_starred, Some(false));
}

#[tokio::test]
async fn deleting_a_set_removes_cards_and_stars() {
    let client = common::client().await;
    let (_auth, user) = common::sign_in(&client).await;
    let set = StudySet::add(&client, &user.id, "Doomed", None)
        .await
        .unwrap();
    let set_id = set.id.unwrap();
    let card = Flashcard::add(&client, set_id, "term", "definition")
        .await
        .unwrap();
    StarredFlashcard::toggle(&client, &user.id, card.id.unwrap())
        .await
        .unwrap();

    assert!(StudySet::delete(&client, set_id).await.unwrap());

    assert!(StudySet::get(&client, set_id).await.unwrap().is_none());
    assert!(Flashcard::get_all(&client, set_id, None).await.unwrap().is_empty());
    assert!(!StarredFlashcard::is_starred(&client, &user.id, card.id.unwrap())
        .await
        .unwrap());

    // Second delete finds nothing
    assert!(!StudySet::delete(&client, set_id).await.unwrap());
}

#[tokio::test]
async fn deleting_a_card_removes_its_star_row() {
    let client = common::client().await;
    let (_auth, user) = common::sign_in(&client).await;
    let set = StudySet::add(&client, &user.id, "Verbs", None)
        .await
        .unwrap();
    let card = Flashcard::add(&client, set.id.unwrap(), "行く", "to go")
        .await
        .unwrap();
    let card_id = card.id.unwrap();

    StarredFlashcard::toggle(&client, &user.id, card_id)
        .await
        .unwrap();
    assert!(Flashcard::delete(&client, card_id).await.unwrap());

    assert!(!StarredFlashcard::is_starred(&client, &user.id, card_id)
        .await
        .unwrap());
    assert!(Flashcard::get_all(&client, set.id.unwrap(), None)
        .await
        .unwrap()
        .is_empty());
}
