use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use rust_decimal::Decimal;
use tradecore_markets::{Order, OrderId, OrderStatus, Sequence, Side, Symbol};

/// Live state of a resting order: the order itself plus the sequence number
/// of its most recent admission to the heap. A stale heap entry (left behind
/// by `cancel` or `modify`) is recognised by its sequence no longer matching
/// this record and is dropped the next time it bubbles to the top.
#[derive(Debug, Clone)]
struct Resting {
    order: Order,
    sequence: u64,
}

trait HeapKey: Ord {
    fn order_id(&self) -> &OrderId;
    fn sequence(&self) -> u64;
}

#[derive(Debug, Clone)]
struct BidEntry {
    price: Decimal,
    sequence: u64,
    order_id: OrderId,
}

impl PartialEq for BidEntry {
    fn eq(&self, other: &Self) -> bool {
        self.price == other.price && self.sequence == other.sequence
    }
}
impl Eq for BidEntry {}

impl PartialOrd for BidEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BidEntry {
    /// Higher price wins; ties go to the lower (earlier) sequence.
    fn cmp(&self, other: &Self) -> Ordering {
        self.price
            .cmp(&other.price)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl HeapKey for BidEntry {
    fn order_id(&self) -> &OrderId {
        &self.order_id
    }
    fn sequence(&self) -> u64 {
        self.sequence
    }
}

#[derive(Debug, Clone)]
struct AskEntry {
    price: Decimal,
    sequence: u64,
    order_id: OrderId,
}

impl PartialEq for AskEntry {
    fn eq(&self, other: &Self) -> bool {
        self.price == other.price && self.sequence == other.sequence
    }
}
impl Eq for AskEntry {}

impl PartialOrd for AskEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AskEntry {
    /// Lower price wins; ties go to the lower (earlier) sequence.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .price
            .cmp(&self.price)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl HeapKey for AskEntry {
    fn order_id(&self) -> &OrderId {
        &self.order_id
    }
    fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// Drops heap entries from the top that no longer match the live `orders`
/// record — either cancelled, modified away, or never live.
fn clean_top<T: HeapKey>(heap: &mut BinaryHeap<T>, orders: &HashMap<OrderId, Resting>) {
    while let Some(top) = heap.peek() {
        match orders.get(top.order_id()) {
            Some(resting) if resting.sequence == top.sequence() => break,
            _ => {
                heap.pop();
            }
        }
    }
}

/// A single symbol's price-time priority order book.
///
/// Bids are ordered by `(highest price, earliest arrival)`; asks by
/// `(lowest price, earliest arrival)`. Cancellation and modification are
/// lazy: stale heap entries are discarded the next time they would surface,
/// rather than being removed from the middle of the heap immediately.
#[derive(Debug)]
pub struct OrderBook {
    symbol: Symbol,
    bids: BinaryHeap<BidEntry>,
    asks: BinaryHeap<AskEntry>,
    orders: HashMap<OrderId, Resting>,
    sequence: Sequence,
    next_ordinal: u64,
}

impl OrderBook {
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            bids: BinaryHeap::new(),
            asks: BinaryHeap::new(),
            orders: HashMap::new(),
            sequence: Sequence::default(),
            next_ordinal: 0,
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    fn fresh_order_id(&mut self) -> OrderId {
        let ordinal = self.next_ordinal;
        self.next_ordinal += 1;
        OrderId::new(format!("{}-{}", self.symbol, ordinal))
    }

    /// Admits `order` into the book, assigning an id if unset and a fresh
    /// sequence number, and inserts it into the correct side.
    pub fn add(&mut self, mut order: Order) -> OrderId {
        let id = order.id.clone().unwrap_or_else(|| self.fresh_order_id());
        order.id = Some(id.clone());
        if order.status == OrderStatus::Pending {
            order.status = OrderStatus::Active;
        }

        let sequence = self.sequence.fetch_add().value();
        let price = order.limit_price;

        match order.side() {
            Side::Buy => self.bids.push(BidEntry {
                price,
                sequence,
                order_id: id.clone(),
            }),
            Side::Sell => self.asks.push(AskEntry {
                price,
                sequence,
                order_id: id.clone(),
            }),
        }

        self.orders.insert(id.clone(), Resting { order, sequence });
        tracing::trace!(symbol = %self.symbol, order_id = %id, sequence, "order admitted to book");
        id
    }

    /// Lazily deletes `id`. Returns `false` if unknown or already removed.
    pub fn cancel(&mut self, id: &OrderId) -> bool {
        let removed = self.orders.remove(id).is_some();
        if removed {
            tracing::trace!(symbol = %self.symbol, order_id = %id, "order cancelled from book");
        }
        removed
    }

    /// Cancels `id` and re-inserts it with the requested changes under a
    /// fresh sequence, resetting time priority. Returns `false` if `id` is
    /// unknown or already removed.
    pub fn modify(
        &mut self,
        id: &OrderId,
        new_price: Option<Decimal>,
        new_quantity: Option<i64>,
    ) -> bool {
        let Some(Resting { mut order, .. }) = self.orders.remove(id) else {
            return false;
        };

        if let Some(price) = new_price {
            order.limit_price = price;
        }
        if let Some(quantity) = new_quantity {
            order.quantity = quantity;
        }

        let sequence = self.sequence.fetch_add().value();
        let price = order.limit_price;
        match order.side() {
            Side::Buy => self.bids.push(BidEntry {
                price,
                sequence,
                order_id: id.clone(),
            }),
            Side::Sell => self.asks.push(AskEntry {
                price,
                sequence,
                order_id: id.clone(),
            }),
        }
        self.orders.insert(id.clone(), Resting { order, sequence });
        true
    }

    pub fn best_bid(&mut self) -> Option<Decimal> {
        clean_top(&mut self.bids, &self.orders);
        self.bids.peek().map(|e| e.price)
    }

    pub fn best_ask(&mut self) -> Option<Decimal> {
        clean_top(&mut self.asks, &self.orders);
        self.asks.peek().map(|e| e.price)
    }

    pub fn spread(&mut self) -> Option<Decimal> {
        let bid = self.best_bid()?;
        let ask = self.best_ask()?;
        Some(ask - bid)
    }

    /// Returns both top-of-book orders if the bid crosses the ask.
    pub fn top_of_book_matchable(&mut self) -> Option<(Order, Order)> {
        clean_top(&mut self.bids, &self.orders);
        clean_top(&mut self.asks, &self.orders);

        let bid_entry = self.bids.peek()?;
        let ask_entry = self.asks.peek()?;
        if bid_entry.price < ask_entry.price {
            return None;
        }

        let bid = self.orders.get(&bid_entry.order_id)?.order.clone();
        let ask = self.orders.get(&ask_entry.order_id)?.order.clone();
        Some((bid, ask))
    }

    /// Aggregate remaining quantity per price level, top `levels` on each side.
    pub fn depth(&self, levels: usize) -> Depth {
        let mut bid_levels: HashMap<Decimal, u64> = HashMap::new();
        for entry in self.bids.iter() {
            if let Some(resting) = self.orders.get(&entry.order_id) {
                if resting.sequence == entry.sequence {
                    *bid_levels.entry(entry.price).or_default() +=
                        resting.order.remaining_quantity();
                }
            }
        }

        let mut ask_levels: HashMap<Decimal, u64> = HashMap::new();
        for entry in self.asks.iter() {
            if let Some(resting) = self.orders.get(&entry.order_id) {
                if resting.sequence == entry.sequence {
                    *ask_levels.entry(entry.price).or_default() +=
                        resting.order.remaining_quantity();
                }
            }
        }

        let mut bids: Vec<(Decimal, u64)> = bid_levels.into_iter().collect();
        bids.sort_by(|a, b| b.0.cmp(&a.0));
        bids.truncate(levels);

        let mut asks: Vec<(Decimal, u64)> = ask_levels.into_iter().collect();
        asks.sort_by(|a, b| a.0.cmp(&b.0));
        asks.truncate(levels);

        Depth { bids, asks }
    }
}

/// Aggregated book depth: `(price, total_remaining_quantity)` per level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Depth {
    pub bids: Vec<(Decimal, u64)>,
    pub asks: Vec<(Decimal, u64)>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn order(symbol: &str, quantity: i64, price: Decimal) -> Order {
        Order::new(Symbol::new(symbol), quantity, price)
    }

    #[test]
    fn best_bid_and_ask_track_top_of_book() {
        let mut book = OrderBook::new(Symbol::new("AAPL"));
        book.add(order("AAPL", 10, dec!(100)));
        book.add(order("AAPL", -5, dec!(101)));
        book.add(order("AAPL", 20, dec!(99.5)));

        assert_eq!(book.best_bid(), Some(dec!(100)));
        assert_eq!(book.best_ask(), Some(dec!(101)));
        assert_eq!(book.spread(), Some(dec!(1)));
        assert!(book.top_of_book_matchable().is_none());
    }

    #[test]
    fn crossing_book_is_matchable() {
        let mut book = OrderBook::new(Symbol::new("AAPL"));
        book.add(order("AAPL", 10, dec!(102)));
        book.add(order("AAPL", -5, dec!(101)));
        book.add(order("AAPL", 15, dec!(101.5)));
        book.add(order("AAPL", -8, dec!(100.5)));

        let (bid, ask) = book.top_of_book_matchable().expect("should cross");
        assert_eq!(bid.limit_price, dec!(102));
        assert_eq!(ask.limit_price, dec!(100.5));
    }

    #[test]
    fn equal_price_resolves_by_arrival_order() {
        let mut book = OrderBook::new(Symbol::new("AAPL"));
        let first = book.add(order("AAPL", 10, dec!(100)));
        let _second = book.add(order("AAPL", 5, dec!(100)));

        assert_eq!(book.best_bid(), Some(dec!(100)));
        let (bid, _) = {
            book.add(order("AAPL", -1, dec!(100)));
            book.top_of_book_matchable().unwrap()
        };
        assert_eq!(bid.id, Some(first));
    }

    #[test]
    fn cancel_is_lazy_and_skipped_on_peek() {
        let mut book = OrderBook::new(Symbol::new("AAPL"));
        let id = book.add(order("AAPL", 10, dec!(100)));
        book.add(order("AAPL", 5, dec!(99)));

        assert!(book.cancel(&id));
        assert_eq!(book.best_bid(), Some(dec!(99)));
        assert!(!book.cancel(&id), "second cancel is a no-op");
    }

    #[test]
    fn modify_resets_time_priority() {
        let mut book = OrderBook::new(Symbol::new("AAPL"));
        let first = book.add(order("AAPL", 10, dec!(100)));
        let second = book.add(order("AAPL", 5, dec!(100)));

        assert!(book.modify(&first, None, Some(20)));

        let (bid, _) = {
            book.add(order("AAPL", -1, dec!(100)));
            book.top_of_book_matchable().unwrap()
        };
        assert_eq!(bid.id, Some(second));
    }

    #[test]
    fn modify_unknown_id_returns_false() {
        let mut book = OrderBook::new(Symbol::new("AAPL"));
        assert!(!book.modify(&OrderId::new("missing"), Some(dec!(1)), None));
    }

    #[test]
    fn depth_aggregates_by_price_level() {
        let mut book = OrderBook::new(Symbol::new("AAPL"));
        book.add(order("AAPL", 10, dec!(100)));
        book.add(order("AAPL", 5, dec!(100)));
        book.add(order("AAPL", 3, dec!(99)));

        let depth = book.depth(5);
        assert_eq!(depth.bids[0], (dec!(100), 15));
        assert_eq!(depth.bids[1], (dec!(99), 3));
    }
}
