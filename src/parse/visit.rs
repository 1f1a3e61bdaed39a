use crate::common::*;
use crate::parse::ast;

pub trait AstVisitor<'a> {
    type Output;

    fn visit<T: ?Sized>(&mut self, node: &T) -> Self::Output
    where
        T: Accept<'a, Self>,
    {
        node.accept(self)
    }

    fn visit_program(&mut self, program: &ast::Program<'a>) -> Self::Output;

    fn visit_integer(&mut self, x: &ast::IntegerLiteral<'a>) -> Self::Output;

    fn visit_dice(&mut self, dice: &ast::DiceLiteral<'a>) -> Self::Output;

    fn visit_prefix(&mut self, op: &PrefixOperator, operand: &ast::Node<'a>) -> Self::Output;

    fn visit_infix(
        &mut self,
        l: &ast::Node<'a>,
        op: &InfixOperator,
        r: &ast::Node<'a>,
    ) -> Self::Output;

    fn visit_illegal(&mut self, text: &'a str) -> Self::Output;
}

pub trait Accept<'a, V: AstVisitor<'a> + ?Sized> {
    fn accept(&self, v: &mut V) -> V::Output;
}

impl<'a, V: AstVisitor<'a> + ?Sized> Accept<'a, V> for ast::Program<'a> {
    fn accept(&self, v: &mut V) -> V::Output {
        v.visit_program(self)
    }
}

impl<'a, V: AstVisitor<'a> + ?Sized> Accept<'a, V> for ast::Node<'a> {
    fn accept(&self, v: &mut V) -> V::Output {
        match self {
            Self::Integer(x) => v.visit_integer(x),
            Self::Dice(x) => v.visit_dice(x),
            Self::Prefix(op, x) => v.visit_prefix(op, x),
            Self::Infix(l, op, r) => v.visit_infix(l, op, r),
            Self::Illegal(text) => v.visit_illegal(text),
        }
    }
}
