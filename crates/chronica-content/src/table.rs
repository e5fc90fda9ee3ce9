//! The standard board table.
//!
//! Thirty cells of authored history, from the fall of Rome to the first
//! factories. Every cell carries a descriptor; a hole here is an authoring
//! defect the session layer reports as a configuration error.

use std::collections::HashMap;

use uuid::Uuid;

use crate::descriptor::{
    BOARD_CELLS, CellEvent, DiceRange, FixedOutcome, Outcome, ResolutionMode, RollEntry,
    TargetGroup,
};

/// Immutable mapping from board cell index to its event descriptor.
#[derive(Debug)]
pub struct EventTable {
    events: HashMap<usize, CellEvent>,
}

impl EventTable {
    /// Builds a table from explicit `(cell, descriptor)` pairs.
    ///
    /// Used by tests and by deployments that author their own boards; the
    /// shipped game uses [`EventTable::standard`].
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = (usize, CellEvent)>) -> Self {
        Self {
            events: entries.into_iter().collect(),
        }
    }

    /// Returns the descriptor for `cell`, if one is configured.
    #[must_use]
    pub fn get(&self, cell: usize) -> Option<&CellEvent> {
        self.events.get(&cell)
    }

    /// Number of configured cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no cells are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterates over `(cell, descriptor)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &CellEvent)> {
        self.events.iter().map(|(cell, event)| (*cell, event))
    }

    /// Builds the standard 30-cell table.
    #[must_use]
    #[allow(clippy::too_many_lines)]
    pub fn standard() -> Self {
        let mut events = HashMap::with_capacity(BOARD_CELLS);
        let mut put = |cell: usize, event: CellEvent| {
            events.insert(cell, event);
        };

        put(
            0,
            fixed(
                "The Long Road",
                "Your chronicle opens at the city gate. Gather your nerve.",
                None,
                vec![on_self(Outcome::None, "Nothing happens yet.")],
            ),
        );
        put(
            1,
            roll(
                "Call to Crusade",
                "A preacher raises the cross, and the levy spares no one. Every player must roll.",
                Some("The road east is long."),
                vec![
                    row_for(
                        TargetGroup::AllAlivePlayers,
                        1,
                        1,
                        Outcome::Eliminate,
                        "You fall on a foreign field.",
                    ),
                    row_for(
                        TargetGroup::AllAlivePlayers,
                        2,
                        4,
                        Outcome::None,
                        "You turn back at the first port. Nothing happens.",
                    ),
                    row_for(
                        TargetGroup::AllAlivePlayers,
                        5,
                        6,
                        Outcome::MoveByOffset(3),
                        "You return laden with plunder. Move forward 3 cells.",
                    ),
                ],
            ),
        );
        put(
            2,
            fixed(
                "Monastic Vows",
                "You take the cowl. No property, no haste, no say in worldly matters.",
                None,
                vec![on_self(Outcome::SkipTurns(2), "Skip 2 turns in contemplation.")],
            ),
        );
        put(
            3,
            fixed(
                "Tournament Champion",
                "Your lance holds true before the whole county. The herald calls your name twice.",
                None,
                vec![on_self(Outcome::RepeatTurn, "Take another turn.")],
            ),
        );
        put(
            4,
            roll(
                "Fever in the Night",
                "The physician bleeds you and prays. Roll for your constitution.",
                None,
                vec![
                    row(1, 4, Outcome::None, "The fever breaks by morning."),
                    row(5, 6, Outcome::Eliminate, "The physician was no help at all."),
                ],
            ),
        );
        put(
            5,
            fixed(
                "Words Above Your Station",
                "You jostle a stranger at the fair and speak your mind. He turns out to own the fair.",
                None,
                vec![on_self(Outcome::SkipTurns(1), "Skip 1 turn in the stocks.")],
            ),
        );
        put(
            6,
            fixed(
                "Failed Harvest",
                "Rain rotted the rye and your tenants go hungry. The blame lands on you.",
                None,
                vec![on_self(Outcome::MoveByOffset(-2), "Go back 2 cells.")],
            ),
        );
        put(
            7,
            fixed(
                "Bountiful Harvest",
                "Granaries full, tithes paid, and enough left over to celebrate.",
                None,
                vec![on_self(Outcome::MoveByOffset(2), "Move forward 2 cells.")],
            ),
        );
        put(
            8,
            roll(
                "The Abbey Brewery",
                "The brothers insist you sample this year's batch. And last year's. Roll.",
                None,
                vec![
                    row(
                        1,
                        1,
                        Outcome::SkipTurns(2),
                        "You stay with the brothers rather longer than planned. Skip 2 turns.",
                    ),
                    row(2, 6, Outcome::None, "You leave at dawn with a clear head."),
                ],
            ),
        );
        put(
            9,
            roll(
                "Siege at the Keep",
                "Banners on the hill and ladders at your walls. Roll for the defense.",
                None,
                vec![
                    row(
                        1,
                        3,
                        Outcome::SkipTurns(1),
                        "The keep falls and you hide in the cellar. Skip 1 turn.",
                    ),
                    row(
                        4,
                        6,
                        Outcome::MoveByOffset(1),
                        "The walls hold. Move forward 1 cell.",
                    ),
                ],
            ),
        );
        put(
            10,
            roll(
                "The Commons Rise",
                "Pitchforks at the manor gate, and you are the manor. Roll.",
                None,
                vec![
                    row(
                        1,
                        3,
                        Outcome::SkipTurns(2),
                        "Your estate is plundered while you wait it out. Skip 2 turns.",
                    ),
                    row(
                        4,
                        6,
                        Outcome::None,
                        "You pass for a farmhand in borrowed clothes. Nothing happens.",
                    ),
                ],
            ),
        );
        put(
            11,
            fixed(
                "Audience in Rome",
                "You kiss the ring, praise the frescoes, and leave with a blessing.",
                None,
                vec![on_self(Outcome::MoveByOffset(1), "Move forward 1 cell.")],
            ),
        );
        put(
            12,
            fixed(
                "Agent of the Inquisition",
                "A quiet word in the right ear, and a rival answers awkward questions.",
                Some("The office is grateful."),
                vec![on(
                    TargetGroup::ChosenPlayer,
                    Outcome::MoveByOffset(-5),
                    "A player of your choice goes back 5 cells.",
                )],
            ),
        );
        put(
            13,
            fixed(
                "Pardons by the Dozen",
                "You sell the same absolution twelve times over. Business is good.",
                None,
                vec![on_self(Outcome::MoveByOffset(1), "Move forward 1 cell.")],
            ),
        );
        put(
            14,
            roll(
                "Heirs to the Cloister",
                "Every child you have is promised to the church. Roll.",
                None,
                vec![
                    row(
                        1,
                        3,
                        Outcome::SkipTurns(2),
                        "The line ends with you, and the paperwork takes ages. Skip 2 turns.",
                    ),
                    row(
                        4,
                        6,
                        Outcome::None,
                        "The novitiate proves too strict and they come home.",
                    ),
                ],
            ),
        );
        put(
            15,
            fixed(
                "An Old Rival Crowned",
                "The boy you thrashed at the grammar school now wears a mitre. You leave town in a hurry.",
                None,
                vec![on_self(Outcome::MoveToCell(8), "Move immediately to cell 8.")],
            ),
        );
        put(
            16,
            roll(
                "The Great Mortality",
                "Carts in the street and crosses on the doors. Roll.",
                None,
                vec![
                    row(1, 4, Outcome::None, "The sickness passes your house by."),
                    row(5, 6, Outcome::Eliminate, "The sickness does not."),
                ],
            ),
        );
        put(
            17,
            fixed(
                "Movable Type",
                "A smith in Mainz is printing pages faster than a scriptorium. The monks are furious.",
                Some("In five hundred years you will be glad of this."),
                vec![on_self(Outcome::None, "Nothing happens.")],
            ),
        );
        put(
            18,
            roll(
                "Trial of the Devout",
                "The tribunal reads names from a ledger, and every devout player's name is on it. Roll.",
                Some("Dark years for the faithful."),
                vec![
                    row_for(
                        TargetGroup::Devout,
                        1,
                        5,
                        Outcome::None,
                        "The tribunal moves on to the next name.",
                    ),
                    row_for(
                        TargetGroup::Devout,
                        6,
                        6,
                        Outcome::Eliminate,
                        "Whoever rolls a six answers to the stake.",
                    ),
                ],
            ),
        );
        put(
            19,
            fixed(
                "Eight Years Unlettered",
                "While the others learned their letters you studied the window. All eight years.",
                None,
                vec![on_self(Outcome::MoveToCell(17), "Move immediately to cell 17.")],
            ),
        );
        put(
            20,
            roll(
                "The Inventor's Notebooks",
                "A Florentine draws flying machines in mirror writing. Roll for your reaction.",
                None,
                vec![
                    row(
                        1,
                        2,
                        Outcome::SkipTurns(1),
                        "You denounce it as devilry and skip 1 turn.",
                    ),
                    row(3, 4, Outcome::None, "You shrug. It will never fly anyway."),
                    row(
                        5,
                        6,
                        Outcome::RepeatTurn,
                        "You cannot form an opinion, so you pass the die along. Take another turn.",
                    ),
                ],
            ),
        );
        put(
            21,
            roll(
                "Landfall in the West",
                "Sailors swear there is a whole continent where the charts show serpents. Roll.",
                None,
                vec![
                    row(
                        1,
                        2,
                        Outcome::SkipTurns(1),
                        "You wanted pepper, not a continent. Sulk for 1 turn.",
                    ),
                    row(3, 4, Outcome::None, "You set sail and the sea sends you home."),
                    row(
                        5,
                        6,
                        Outcome::None,
                        "You cannot read the news anyway. Smile and carry on.",
                    ),
                ],
            ),
        );
        put(
            22,
            roll(
                "Theses on the Door",
                "A monk nails ninety-five complaints to a church door. Everyone takes a side. Roll.",
                None,
                vec![
                    row(
                        1,
                        2,
                        Outcome::SkipTurns(1),
                        "You mourn the old rites and skip 1 turn.",
                    ),
                    row(3, 4, Outcome::None, "You keep your head down and your tithe small."),
                    row(5, 6, Outcome::None, "You argue both sides, loudly, in two taverns."),
                ],
            ),
        );
        put(
            23,
            fixed(
                "The Old Rites Forbidden",
                "The new order bans the processions you grew up with. You stay home in protest.",
                None,
                vec![on_self(Outcome::SkipTurns(1), "Skip 1 turn.")],
            ),
        );
        put(
            24,
            fixed(
                "The Silk Caravans",
                "The eastern routes open and the markets swell. Good news for some.",
                None,
                vec![
                    on(
                        TargetGroup::Merchants,
                        Outcome::MoveByOffset(1),
                        "Every merchant moves forward 1 cell.",
                    ),
                    on(
                        TargetGroup::NonMerchants,
                        Outcome::MoveByOffset(-1),
                        "Everyone else pays the new prices and goes back 1 cell.",
                    ),
                ],
            ),
        );
        put(
            25,
            roll(
                "Thirty Years of War",
                "Armies cross the land in every direction and none of them pay for their lodging. Roll.",
                None,
                vec![
                    row(1, 1, Outcome::Eliminate, "You die in the battle line."),
                    row(
                        2,
                        2,
                        Outcome::Eliminate,
                        "You die of camp fever without ever seeing the battle.",
                    ),
                    row(
                        3,
                        6,
                        Outcome::SkipTurns(2),
                        "You hide in the woods until it is over. Skip 2 turns.",
                    ),
                ],
            ),
        );
        put(
            26,
            fixed(
                "An Uneasy Peace",
                "The treaties are signed and the bells ring. Rebuild what you can.",
                Some("Rest while it lasts."),
                vec![on_self(Outcome::None, "Nothing happens.")],
            ),
        );
        put(
            27,
            fixed(
                "Banker to Princes",
                "A cardinal needs a loan and you happen to have terms ready.",
                None,
                vec![on_self(Outcome::MoveByOffset(2), "Move forward 2 cells.")],
            ),
        );
        put(
            28,
            roll(
                "Eyes on the Heavens",
                "Your telescope finds moons where scripture says there are none, and you publish. Roll.",
                None,
                vec![
                    row(
                        1,
                        2,
                        Outcome::SkipTurns(1),
                        "You recant on your knees and skip 1 turn.",
                    ),
                    row(3, 4, Outcome::Eliminate, "The tribunal is not persuaded."),
                    row(
                        5,
                        6,
                        Outcome::MoveByOffset(3),
                        "Your book crosses every border. Move forward 3 cells.",
                    ),
                ],
            ),
        );
        put(
            29,
            roll(
                "The Engines of Industry",
                "The first mills run on steam and the villages empty into the towns. Roll.",
                None,
                vec![
                    row(
                        1,
                        3,
                        Outcome::None,
                        "You take the mill wage. In two hundred years your heirs will thank you.",
                    ),
                    row(
                        4,
                        6,
                        Outcome::SkipTurns(2),
                        "You keep to honest field work, pulling the plow yourself. Skip 2 turns.",
                    ),
                ],
            ),
        );

        Self { events }
    }
}

fn fixed(
    title: &'static str,
    description: &'static str,
    narration: Option<&'static str>,
    outcomes: Vec<FixedOutcome>,
) -> CellEvent {
    CellEvent {
        id: Uuid::new_v4(),
        title,
        description,
        narration,
        resolution: ResolutionMode::Fixed(outcomes),
    }
}

fn roll(
    title: &'static str,
    description: &'static str,
    narration: Option<&'static str>,
    entries: Vec<RollEntry>,
) -> CellEvent {
    CellEvent {
        id: Uuid::new_v4(),
        title,
        description,
        narration,
        resolution: ResolutionMode::Roll(entries),
    }
}

fn on_self(outcome: Outcome, text: &'static str) -> FixedOutcome {
    on(TargetGroup::CurrentPlayer, outcome, text)
}

fn on(target: TargetGroup, outcome: Outcome, text: &'static str) -> FixedOutcome {
    FixedOutcome {
        outcome,
        target,
        text,
    }
}

fn row(from: u32, to: u32, outcome: Outcome, text: &'static str) -> RollEntry {
    row_for(TargetGroup::CurrentPlayer, from, to, outcome, text)
}

fn row_for(
    target: TargetGroup,
    from: u32,
    to: u32,
    outcome: Outcome,
    text: &'static str,
) -> RollEntry {
    RollEntry {
        range: DiceRange::new(from, to),
        outcome,
        target,
        text,
    }
}
