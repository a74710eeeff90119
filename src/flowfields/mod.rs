//! Flowfields are a means of handling pathfinding for a crowd of actors.
//!
//! [Fixing Pathfinding Once and For All](https://web.archive.org/web/20150905073624/http://www.ai-blog.net/archives/000152.html)
//!
//! [SupCom2- Elijah Emerson](https://www.gameaipro.com/GameAIPro/GameAIPro_Chapter23_Crowd_Pathfinding_and_Steering_Using_Flow_Field_Tiles.pdf)
//!
//! [jdxdev](https://www.jdxdev.com/blog/2020/05/03/flowfields/)
//!
//! [leifnode](https://leifnode.com/2013/12/flow-field-pathfinding/)
//!
//! A single field covers the whole grid and is built towards one goal at a time. Definitions:
//!
//! * Grid - a `width x height` array of square cells laid over the world, indexed from its bottom-left corner
//! * Cost field - 8-bit field where a value of 255 represents impassable terrain and range 1 - 254
//! represents the cost of traversing that grid location, 1 being the default and easiest. You could define
//! a value of 56 for instance as being a slope or swamp and in such a case pathfinding will try to avoid it
//! * Integration field - uses the cost field as input and stores the calculated cost-to-goal (cost to path to the eventual location you want to end up at)
//! * Flow field - one direction per cell pointing at the cheapest neighbour, agents read the direction of the cell they stand in and move that way
//! * Occupancy - which agent currently stands in each cell, used to slow agents queueing behind each other
//!

pub mod error;
pub mod fields;
pub mod grid;
pub mod motion;
pub mod navigation;
pub mod occupancy;
pub mod utilities;
