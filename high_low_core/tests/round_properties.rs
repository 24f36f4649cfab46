/// 基于 proptest 的状态机性质测试
///
/// 随机生成一长串意图，验证资金守恒、下注范围、牌堆永不耗尽
/// 以及游戏只会通过退出或资金耗尽后的“继续”结束。
use high_low_core::*;
use proptest::prelude::*;

// 生成任意意图，下注额覆盖合法和非法的范围
fn intent_strategy() -> impl Strategy<Value = Intent> {
    prop_oneof![
        4 => (-5i64..200).prop_map(Intent::SetBet),
        3 => Just(Intent::Guess(Guess::Higher)),
        3 => Just(Intent::Guess(Guess::Lower)),
        2 => Just(Intent::Pass),
        3 => Just(Intent::Continue),
        1 => Just(Intent::Quit),
        1 => Just(Intent::Restart),
    ]
}

fn settings_strategy() -> impl Strategy<Value = Settings> {
    (1i64..300, 1i64..300).prop_map(|(starting_money, starting_pot)| Settings { starting_money, starting_pot })
}

// 把动画跑完，返回动画期间是否出现过 GameOver
fn finish_animation(state: &mut RoundState) -> bool {
    let mut saw_game_over = false;
    while state.phase == Phase::Animating {
        tick(state);
        saw_game_over |= state.phase == Phase::GameOver;
    }
    saw_game_over
}

proptest! {
    #[test]
    fn test_money_is_conserved(settings in settings_strategy(), intents in prop::collection::vec(intent_strategy(), 1..300)) {
        let mut state = new_game(settings);
        let total = state.total_funds();

        prop_assert_eq!(total, settings.starting_money + settings.starting_pot);

        // 重新开始回到同样的初始资金，所以总额在整个序列中都不变
        for intent in intents {
            apply_intent(&mut state, intent);
            finish_animation(&mut state);
            prop_assert_eq!(state.total_funds(), total, "资金总额在 {:?} 后发生变化", intent);
        }
    }

    #[test]
    fn test_set_bet_accepted_iff_in_bounds(settings in settings_strategy(), amount in -10i64..400) {
        let mut state = new_game(settings);
        let before = state.snapshot();
        let accepted = apply_intent(&mut state, Intent::SetBet(amount));
        let in_bounds = amount >= 1 && amount <= settings.starting_money.min(settings.starting_pot);

        prop_assert_eq!(accepted, in_bounds);
        if in_bounds {
            prop_assert_eq!(state.bet_amount, amount);
            prop_assert!(state.bet_ready);
        } else {
            prop_assert_eq!(state.snapshot(), before);
        }
    }

    #[test]
    fn test_deck_never_runs_out(seq in prop::collection::vec(prop_oneof![Just(Intent::Pass), Just(Intent::Guess(Guess::Higher)), Just(Intent::Guess(Guess::Lower))], 1..400)) {
        // 资金足够大，保证整个序列都在下注阶段循环
        let mut state = new_game(Settings { starting_money: 1_000_000, starting_pot: 1_000_000 });
        for intent in seq {
            prop_assert!(apply_intent(&mut state, Intent::SetBet(1)));
            prop_assert!(apply_intent(&mut state, intent));
            finish_animation(&mut state);
            if state.phase == Phase::ShowingResult {
                prop_assert!(apply_intent(&mut state, Intent::Continue));
            }
            prop_assert_eq!(state.phase, Phase::AwaitingBet);
            prop_assert!(state.deck.len() < FULL_DECK_SIZE);
        }
    }

    #[test]
    fn test_game_over_only_by_quit_or_continue(settings in settings_strategy(), intents in prop::collection::vec(intent_strategy(), 1..300)) {
        let mut state = new_game(settings);
        for intent in intents {
            let before = state.clone();
            apply_intent(&mut state, intent);
            prop_assert!(!finish_animation(&mut state), "动画过程中不应进入 GameOver");

            if before.phase != Phase::GameOver && state.phase == Phase::GameOver {
                match intent {
                    Intent::Quit => prop_assert_eq!(state.outcome, Some(Outcome::Quit)),
                    Intent::Continue => prop_assert!(before.funds_exhausted()),
                    other => prop_assert!(false, "{:?} 不应结束游戏", other),
                }
            }
        }
    }

    #[test]
    fn test_tie_costs_double(bet in 1i64..50, rank in 2u8..=14, guess in prop_oneof![Just(Guess::Higher), Just(Guess::Lower)]) {
        let rank = Rank::from_value(rank).unwrap();
        let mut state = new_game(Settings { starting_money: 100, starting_pot: 50 });
        state.current_card = Card::new(rank, Suit::Spade);
        state.deck = Deck::from_cards(vec![Card::new(Rank::Two, Suit::Club), Card::new(Rank::Two, Suit::Club), Card::new(Rank::Two, Suit::Club), Card::new(rank, Suit::Heart)]);

        prop_assert!(apply_intent(&mut state, Intent::SetBet(bet)));
        prop_assert!(apply_intent(&mut state, Intent::Guess(guess)));
        finish_animation(&mut state);

        prop_assert_eq!(state.outcome, Some(Outcome::Tie));
        prop_assert_eq!(state.player_money, 100 - 2 * bet);
        prop_assert_eq!(state.pot, 50 + 2 * bet);
    }
}
